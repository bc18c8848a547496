use serde::Deserialize;

use crate::error::{AppError, Result};

/// Whether a submission enters a single player or a full squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Solo,
    Squad,
}

impl RegistrationKind {
    /// Decodes the raw `registrationType` form field. Only the literal
    /// "SQUAD" selects a squad entry; anything else (including a missing
    /// field) falls back to solo. This mirrors how the form has always
    /// behaved, so unknown values are logged rather than rejected.
    pub fn from_field(raw: Option<&str>) -> Self {
        match raw {
            Some("SQUAD") => Self::Squad,
            other => {
                if let Some(value) = other {
                    if value != "SOLO" {
                        tracing::debug!(value, "Unrecognized registrationType, treating as SOLO");
                    }
                }
                Self::Solo
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "SOLO",
            Self::Squad => "SQUAD",
        }
    }
}

/// Raw text fields collected from the multipart body. Everything is optional
/// here; validation happens when the form is turned into a submission.
#[derive(Debug, Default, Clone)]
pub struct RegistrationForm {
    pub registration_type: Option<String>,
    pub player_name: Option<String>,
    pub free_fire_uid: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub teammate_uids: [Option<String>; 3],
}

impl RegistrationForm {
    /// Routes one multipart text field into the form. Unknown field names
    /// are ignored, matching the permissive intake of the original form.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "registrationType" => self.registration_type = Some(value),
            "playerName" => self.player_name = Some(value),
            "freeFireUID" => self.free_fire_uid = Some(value),
            "email" => self.email = Some(value),
            "phone" => self.phone = Some(value),
            "paymentMethod" => self.payment_method = Some(value),
            "teammate1UID" => self.teammate_uids[0] = Some(value),
            "teammate2UID" => self.teammate_uids[1] = Some(value),
            "teammate3UID" => self.teammate_uids[2] = Some(value),
            _ => {}
        }
    }
}

/// A validated registration, immutable for the rest of the request.
#[derive(Debug, Clone)]
pub struct RegistrationSubmission {
    pub kind: RegistrationKind,
    /// Player name for solo entries, squad leader name otherwise.
    pub player_name: String,
    /// Player UID for solo entries, squad leader UID otherwise.
    pub primary_uid: String,
    pub email: String,
    pub phone: String,
    pub payment_method: String,
    /// Exactly 3 entries for squads, empty for solo, input order preserved.
    pub teammate_uids: Vec<String>,
    /// Public URL of the uploaded payment screenshot.
    pub screenshot_url: String,
}

impl RegistrationSubmission {
    pub fn from_form(form: RegistrationForm, screenshot_url: String) -> Result<Self> {
        if screenshot_url.is_empty() {
            return Err(AppError::Validation(
                "Payment screenshot is required".to_string(),
            ));
        }

        let kind = RegistrationKind::from_field(form.registration_type.as_deref());

        let teammate_uids = match kind {
            RegistrationKind::Solo => Vec::new(),
            RegistrationKind::Squad => {
                let [t1, t2, t3] = form.teammate_uids;
                vec![
                    required(t1, "teammate1UID")?,
                    required(t2, "teammate2UID")?,
                    required(t3, "teammate3UID")?,
                ]
            }
        };

        Ok(Self {
            kind,
            player_name: required(form.player_name, "playerName")?,
            primary_uid: required(form.free_fire_uid, "freeFireUID")?,
            email: required(form.email, "email")?,
            phone: required(form.phone, "phone")?,
            payment_method: required(form.payment_method, "paymentMethod")?,
            teammate_uids,
            screenshot_url,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Missing required field: {field}"))),
    }
}

/// One support-form message, forwarded verbatim to the contact bot.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactTicket {
    pub name: String,
    pub phone: String,
    pub uid: String,
    pub message: String,
}
