pub mod email_validator;
