use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::{
    core::upload::accept_upload,
    schema::{
        common::MessageResponse,
        user::{
            UserCreateResponses, UserDeleteResponses, UserDetailResponses, UserFormRequest,
            UserUpdateResponses,
        },
    },
    service::user::{create_user_with_picture, delete_user, get_user, update_user_with_picture},
    AppState,
};

#[derive(Tags)]
enum ApiUserTags {
    User,
}

pub struct ApiUser;

#[OpenApi]
impl ApiUser {
    #[oai(path = "/users/:id", method = "get", tag = "ApiUserTags::User")]
    async fn user_detail_api(
        &self,
        Path(id): Path<i32>,
        state: Data<&Arc<AppState>>,
    ) -> UserDetailResponses {
        match get_user(&state.db, id).await {
            Ok(user) => UserDetailResponses::Ok(Json(user.into())),
            Err(err) => err.into(),
        }
    }

    #[oai(path = "/users", method = "post", tag = "ApiUserTags::User")]
    async fn create_user_api(
        &self,
        form: UserFormRequest,
        state: Data<&Arc<AppState>>,
    ) -> UserCreateResponses {
        let (fields, picture) = form.into_parts();

        // Stored before the insert; the service removes it again if the insert fails
        let new_picture = match picture {
            Some(upload) => match accept_upload(&state.file_store, upload).await {
                Ok(path) => Some(path),
                Err(err) => return err.into(),
            },
            None => None,
        };

        match create_user_with_picture(&state.db, &state.file_store, fields, new_picture).await {
            Ok(user) => {
                tracing::info!("created user {}", user.id);
                UserCreateResponses::Created(Json(user.into()))
            }
            Err(err) => err.into(),
        }
    }

    #[oai(path = "/users/:id", method = "put", tag = "ApiUserTags::User")]
    async fn update_user_api(
        &self,
        Path(id): Path<i32>,
        form: UserFormRequest,
        state: Data<&Arc<AppState>>,
    ) -> UserUpdateResponses {
        let (fields, picture) = form.into_parts();

        let new_picture = match picture {
            Some(upload) => match accept_upload(&state.file_store, upload).await {
                Ok(path) => Some(path),
                Err(err) => return err.into(),
            },
            None => None,
        };

        match update_user_with_picture(&state.db, &state.file_store, id, fields, new_picture).await
        {
            Ok(user) => {
                tracing::info!("updated user {}", user.id);
                UserUpdateResponses::Ok(Json(user.into()))
            }
            Err(err) => err.into(),
        }
    }

    #[oai(path = "/users/:id", method = "delete", tag = "ApiUserTags::User")]
    async fn delete_user_api(
        &self,
        Path(id): Path<i32>,
        state: Data<&Arc<AppState>>,
    ) -> UserDeleteResponses {
        match delete_user(&state.db, &state.file_store, id).await {
            Ok(_) => {
                tracing::info!("deleted user {}", id);
                UserDeleteResponses::Ok(Json(MessageResponse {
                    message: "User deleted successfully".to_string(),
                }))
            }
            Err(err) => err.into(),
        }
    }
}
