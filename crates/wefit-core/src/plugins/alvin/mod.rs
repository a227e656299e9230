//! Alvin plugin: NASA imagery and the user-record oracle.

mod apod;
mod cosmos;
mod create_user;
mod mars_rover;

use reqwest::Client;
use std::sync::Arc;

use crate::plugin::Plugin;
use crate::services::nasa::NasaClient;
use crate::services::users_api::UsersApi;

pub use apod::ApodAction;
pub use cosmos::GetUserRecordAction;
pub use create_user::CreateUserAction;
pub use mars_rover::MarsRoverAction;

/// Build the alvin plugin: APOD, Mars rover, and user-record actions.
pub fn alvin_plugin(http: Client, nasa_api_key: &str, users_api_url: &str) -> Plugin {
    let nasa = Arc::new(NasaClient::new(http.clone(), nasa_api_key));
    let users = Arc::new(UsersApi::new(http, users_api_url));

    Plugin::new("alvin", "NASA imagery and user registration")
        .with_action(Box::new(ApodAction::new(Arc::clone(&nasa))))
        .with_action(Box::new(MarsRoverAction::new(nasa)))
        .with_action(Box::new(GetUserRecordAction::new(Arc::clone(&users))))
        .with_action(Box::new(CreateUserAction::new(users)))
}
