//! Ehis plugin: medical assistant actions (Vietnamese UX).

mod contact;
mod drug_interaction;
mod image_analysis;
mod thongso;

use reqwest::Client;
use std::sync::Arc;

use crate::plugin::Plugin;
use crate::services::gemini::GeminiClient;
use crate::services::hospital::HospitalClient;
use crate::services::treatments_api::TreatmentsApi;

pub use contact::ContactInfoAction;
pub use drug_interaction::DrugInteractionAction;
pub use image_analysis::ImageAnalysisAction;
pub use thongso::ThongSoAction;

/// Build the ehis plugin: drug interactions, medical imaging, hospital
/// API access, and contact info.
pub struct EhisConfig {
    pub treatments_api_url: String,
    pub google_api_key: String,
    pub hospital_api_url: String,
    pub hospital_bearer_token: String,
}

pub fn ehis_plugin(http: Client, config: &EhisConfig) -> Plugin {
    let treatments = Arc::new(TreatmentsApi::new(http.clone(), &config.treatments_api_url));
    let gemini = Arc::new(GeminiClient::new(http.clone(), &config.google_api_key));
    let hospital = Arc::new(HospitalClient::new(
        http,
        &config.hospital_api_url,
        &config.hospital_bearer_token,
    ));

    Plugin::new("ehis", "Medical assistant: drug interactions and imaging")
        .with_action(Box::new(DrugInteractionAction::new(treatments)))
        .with_action(Box::new(ImageAnalysisAction::new(gemini)))
        .with_action(Box::new(ThongSoAction::new(hospital)))
        .with_action(Box::new(ContactInfoAction))
}
