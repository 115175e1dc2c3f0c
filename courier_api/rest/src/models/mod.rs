use serde::Serialize;

pub mod contact;

#[derive(Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
}
