use std::backtrace::Backtrace;
use log::error;
use rocket::http::Status;
use rocket::response::status::Custom;

use crate::store::DirectoryError;

pub(crate) fn status_directory_error(err: DirectoryError) -> Custom<String> {
    match err {
        DirectoryError::Store(message, cause) => {
            error!("Store error: {cause}\nbacktrace: {}", Backtrace::capture());
            // the cause stays server-side, callers get the generic message
            Custom(Status::InternalServerError, message.to_string())
        }
        other => Custom(Status::BadRequest, other.to_string()),
    }
}
