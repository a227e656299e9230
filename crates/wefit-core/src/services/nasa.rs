//! NASA API client: Astronomy Picture of the Day and Mars rover photos.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ServiceError;

const APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
const MARS_PHOTOS_URL: &str = "https://api.nasa.gov/mars-photos/api/v1/rovers";

/// Cameras available on the Curiosity rover.
const CURIOSITY_CAMERAS: &[&str] = &[
    "FHAZ", "RHAZ", "MAST", "CHEMCAM", "NAVCAM", "MARDI", "MAHLI",
];

/// Highest Martian sol with archived Curiosity photos.
const CURIOSITY_MAX_SOL: u32 = 3400;

/// How many random (sol, camera) draws to try before giving up.
const MAX_DRAWS: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Apod {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub struct MarsRoverPhoto {
    pub photo: String,
    pub sol: u32,
    pub camera: String,
    pub rover: String,
}

#[derive(Deserialize)]
struct MarsPhotosResponse {
    photos: Vec<MarsPhotoEntry>,
}

#[derive(Deserialize)]
struct MarsPhotoEntry {
    img_src: String,
}

#[derive(Deserialize)]
struct NasaErrorBody {
    #[serde(default)]
    msg: Option<String>,
}

pub struct NasaClient {
    client: Client,
    api_key: String,
}

impl NasaClient {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    /// Fetch the Astronomy Picture of the Day.
    pub async fn apod(&self) -> Result<Apod, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingKey("NASA_API_KEY"));
        }

        debug!("Fetching NASA APOD");

        let resp = self
            .client
            .get(APOD_URL)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<NasaErrorBody>()
                .await
                .ok()
                .and_then(|b| b.msg)
                .unwrap_or_else(|| status.to_string());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json::<Apod>().await?)
    }

    /// Fetch a random Mars rover photo.
    ///
    /// A random (sol, camera) pair sometimes has no archived photos, so
    /// the draw is resampled up to [`MAX_DRAWS`] times. This is sampling
    /// over the archive, not transport retry.
    pub async fn mars_rover_photo(&self) -> Result<MarsRoverPhoto, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingKey("NASA_API_KEY"));
        }

        for attempt in 0..MAX_DRAWS {
            let (camera, sol) = random_draw();
            debug!(attempt, camera, sol, "Trying Mars rover photo draw");

            let url = format!("{}/curiosity/photos", MARS_PHOTOS_URL);
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("sol", sol.to_string()),
                    ("camera", camera.to_string()),
                    ("api_key", self.api_key.clone()),
                ])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ServiceError::Status {
                    status: status.as_u16(),
                    message: status.to_string(),
                });
            }

            let body: MarsPhotosResponse = resp.json().await?;
            if let Some(first) = body.photos.into_iter().next() {
                return Ok(MarsRoverPhoto {
                    photo: first.img_src,
                    sol,
                    camera: camera.to_string(),
                    rover: "curiosity".to_string(),
                });
            }
        }

        Err(ServiceError::Decode(format!(
            "no Mars photos found after {} draws",
            MAX_DRAWS
        )))
    }
}

/// Pick a random camera and sol for the Curiosity rover.
fn random_draw() -> (&'static str, u32) {
    let mut rng = rand::thread_rng();
    let camera = CURIOSITY_CAMERAS
        .choose(&mut rng)
        .copied()
        .unwrap_or("NAVCAM");
    let sol = rng.gen_range(1..=CURIOSITY_MAX_SOL);
    (camera, sol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_draw_in_range() {
        for _ in 0..100 {
            let (camera, sol) = random_draw();
            assert!(CURIOSITY_CAMERAS.contains(&camera));
            assert!((1..=CURIOSITY_MAX_SOL).contains(&sol));
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let client = NasaClient::new(Client::new(), "");
        let err = client.apod().await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingKey("NASA_API_KEY")));

        let err = client.mars_rover_photo().await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingKey(_)));
    }
}
