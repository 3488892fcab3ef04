use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};

use crate::store::{ClassDirectory, ClassWithTutor, NewClass};
use crate::util::status_directory_error;

#[get("/classes?<subject>&<week_day>&<time>")]
async fn get_classes(
    subject: Option<&str>,
    week_day: Option<&str>,
    time: Option<&str>,
    directory: &State<ClassDirectory>,
) -> Result<Json<Vec<ClassWithTutor>>, Custom<String>> {
    let classes = directory
        .search(subject, week_day, time)
        .await
        .map_err(status_directory_error)?;
    Ok(Json(classes))
}

#[post("/classes", data = "<new_class>")]
async fn post_classes(
    new_class: Json<NewClass>,
    directory: &State<ClassDirectory>,
) -> Result<Custom<()>, Custom<String>> {
    directory
        .register(&new_class)
        .await
        .map_err(status_directory_error)?;
    Ok(Custom(Status::Created, ()))
}

pub fn extend(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/", routes![
            get_classes,
            post_classes,
        ])
}
