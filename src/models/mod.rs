pub mod dto;
pub mod request;
