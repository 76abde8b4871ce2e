use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::request::{NewRequest, Priority, RequestChanges, RequestFilter, Status};

const TITLE_LENGTH: RangeInclusive<usize> = 3..=100;
const DESCRIPTION_LENGTH: RangeInclusive<usize> = 10..=500;

/// Request bodies are only ever read from a JSON object.
pub type JsonObject = Map<String, Value>;

// Enum fields take any JSON value so that an unknown string, a number or an
// object all map to the field's own validation message.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRequestDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequestDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

impl TryFrom<JsonObject> for CreateRequestDto {
    type Error = serde_json::Error;

    fn try_from(body: JsonObject) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(body))
    }
}

impl TryFrom<JsonObject> for UpdateRequestDto {
    type Error = serde_json::Error;

    fn try_from(body: JsonObject) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(body))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

fn validate_title(title: Option<String>) -> Result<String, ValidationError> {
    match title {
        Some(title) if TITLE_LENGTH.contains(&title.chars().count()) => Ok(title),
        _ => Err(ValidationError::TitleLength),
    }
}

fn validate_description(description: Option<String>) -> Result<String, ValidationError> {
    match description {
        Some(description) if DESCRIPTION_LENGTH.contains(&description.chars().count()) => {
            Ok(description)
        }
        _ => Err(ValidationError::DescriptionLength),
    }
}

fn parse_choice<T>(value: Value, invalid: ValidationError) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    match value {
        Value::String(choice) => choice.parse(),
        _ => Err(invalid),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CreateRequestDto {
    /// Checks title, description and priority in that order and stops at the first failure.
    pub fn validate(self) -> Result<NewRequest, ValidationError> {
        let title = validate_title(self.title)?;
        let description = validate_description(self.description)?;
        let priority = self
            .priority
            .ok_or(ValidationError::InvalidPriority)
            .and_then(|p| parse_choice::<Priority>(p, ValidationError::InvalidPriority))?;
        Ok(NewRequest {
            title,
            description,
            priority,
            created_by: non_empty(self.created_by),
        })
    }
}

impl UpdateRequestDto {
    /// Same rules as creation, applied only to the fields that are present.
    pub fn validate(self) -> Result<RequestChanges, ValidationError> {
        let title = match self.title {
            Some(title) => Some(validate_title(Some(title))?),
            None => None,
        };
        let description = match self.description {
            Some(description) => Some(validate_description(Some(description))?),
            None => None,
        };
        let priority = self
            .priority
            .map(|p| parse_choice::<Priority>(p, ValidationError::InvalidPriority))
            .transpose()?;
        let status = self
            .status
            .map(|s| parse_choice::<Status>(s, ValidationError::InvalidStatus))
            .transpose()?;
        Ok(RequestChanges {
            title,
            description,
            priority,
            status,
        })
    }
}

impl RequestQuery {
    pub fn into_filter(self) -> Result<RequestFilter, ValidationError> {
        Ok(RequestFilter {
            search: non_empty(self.search),
            status: non_empty(self.status)
                .map(|s| s.parse::<Status>())
                .transpose()?,
            priority: non_empty(self.priority)
                .map(|p| p.parse::<Priority>())
                .transpose()?,
        })
    }
}
