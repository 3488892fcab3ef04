#[macro_use] extern crate rocket;

use crate::db::DbPoolFairing;

mod classes;
mod db;
mod store;
mod timeutil;
mod util;

#[launch]
fn rocket() -> _ {
    let rocket = rocket::build()
        .attach(DbPoolFairing());
    classes::extend(rocket)
}
