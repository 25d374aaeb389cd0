use poem_openapi::{payload::Json, types::multipart::Upload, ApiResponse, Multipart, Object};
use serde::Deserialize;

use super::common::{ErrorResponse, MessageResponse};
use crate::{
    core::{error::AppError, utils::datetime_to_string, utils::non_empty},
    model::user::{User, UserFields},
};

/// Multipart body shared by create and update.
#[derive(Multipart)]
pub struct UserFormRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<Upload>,
}

impl UserFormRequest {
    pub fn into_parts(self) -> (UserFields, Option<Upload>) {
        let fields = UserFields {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            country: non_empty(self.country),
            city: non_empty(self.city),
            phone_number: non_empty(self.phone_number),
            profile_picture: None,
        };
        (fields, self.profile_picture.filter(is_file_part))
    }
}

/// Browsers send an empty file input as a part with `filename=""`, and some
/// clients echo the current picture path back as a plain text part. Neither
/// is a new upload.
fn is_file_part(upload: &Upload) -> bool {
    upload.file_name().is_some_and(|x| !x.is_empty())
}

#[derive(Object, Deserialize, Debug)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            country: user.country,
            city: user.city,
            phone_number: user.phone_number,
            profile_picture: user.profile_picture,
            created_at: datetime_to_string(user.created_at),
            updated_at: datetime_to_string(user.updated_at),
        }
    }
}

#[derive(ApiResponse)]
pub enum UserDetailResponses {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<ErrorResponse>),
}

impl From<AppError> for UserDetailResponses {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(message) => Self::NotFound(Json(ErrorResponse::new(message))),
            err => Self::InternalServerError(Json(ErrorResponse::internal("user_detail_api", &err))),
        }
    }
}

#[derive(ApiResponse)]
pub enum UserCreateResponses {
    #[oai(status = 201)]
    Created(Json<UserResponse>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<ErrorResponse>),
}

impl From<AppError> for UserCreateResponses {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(message) => Self::BadRequest(Json(ErrorResponse::new(message))),
            AppError::Conflict(message) => Self::Conflict(Json(ErrorResponse::new(message))),
            err => Self::InternalServerError(Json(ErrorResponse::internal("create_user_api", &err))),
        }
    }
}

#[derive(ApiResponse)]
pub enum UserUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<ErrorResponse>),
}

impl From<AppError> for UserUpdateResponses {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(message) => Self::BadRequest(Json(ErrorResponse::new(message))),
            AppError::NotFound(message) => Self::NotFound(Json(ErrorResponse::new(message))),
            AppError::Conflict(message) => Self::Conflict(Json(ErrorResponse::new(message))),
            err => Self::InternalServerError(Json(ErrorResponse::internal("update_user_api", &err))),
        }
    }
}

#[derive(ApiResponse)]
pub enum UserDeleteResponses {
    #[oai(status = 200)]
    Ok(Json<MessageResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<ErrorResponse>),
}

impl From<AppError> for UserDeleteResponses {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(message) => Self::NotFound(Json(ErrorResponse::new(message))),
            err => Self::InternalServerError(Json(ErrorResponse::internal("delete_user_api", &err))),
        }
    }
}
