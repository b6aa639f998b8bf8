use serde::{Deserialize, Serialize};

/// Classification of the health report being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosisType {
    Confirmed,
    Probable,
    SelfReported,
}

impl std::fmt::Display for DiagnosisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosisType::Confirmed => write!(f, "confirmed"),
            DiagnosisType::Probable => write!(f, "probable"),
            DiagnosisType::SelfReported => write!(f, "self-reported"),
        }
    }
}

/// One temporary exposure key as handed out by the platform key store.
///
/// `key_data` is opaque, already base64-encoded key material; the remaining
/// fields carry the rolling-window metadata the upload endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryExposureKey {
    pub key_data: String,
    pub rolling_start_number: u32,
    pub rolling_period: u32,
    pub transmission_risk_level: u8,
}

/// User-supplied contact data. Only the mobile number reaches this core;
/// everything else stays in the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalData {
    pub mobile_number: String,
}

/// A one-time authorization token bound to a user-entered confirmation code.
///
/// Proves phone-number ownership to the report endpoint. At most one exists
/// per report flow; re-binding a new code overwrites it, never merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(rename = "uuid")]
    pub token_id: String,
    #[serde(rename = "authorization")]
    pub confirmation_code: String,
}

/// The assembled report bundle: collected keys, diagnosis classification,
/// and the verification payload. Immutable once handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracingKeys {
    pub temporary_exposure_keys: Vec<TemporaryExposureKey>,
    pub diagnosis_type: DiagnosisType,
    pub verification_payload: Verification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_keys_serialize_with_wire_field_names() {
        let keys = TracingKeys {
            temporary_exposure_keys: vec![TemporaryExposureKey {
                key_data: "a2V5".to_string(),
                rolling_start_number: 2_650_847,
                rolling_period: 144,
                transmission_risk_level: 4,
            }],
            diagnosis_type: DiagnosisType::Confirmed,
            verification_payload: Verification {
                token_id: "T1".to_string(),
                confirmation_code: "123456".to_string(),
            },
        };

        let json = serde_json::to_value(&keys).expect("serializes");
        assert_eq!(json["diagnosisType"], "confirmed");
        assert_eq!(json["verificationPayload"]["uuid"], "T1");
        assert_eq!(json["verificationPayload"]["authorization"], "123456");
        assert_eq!(
            json["temporaryExposureKeys"][0]["keyData"],
            "a2V5"
        );
    }

    #[test]
    fn diagnosis_type_round_trips_kebab_case() {
        let json = serde_json::to_string(&DiagnosisType::SelfReported).expect("serializes");
        assert_eq!(json, "\"self-reported\"");
        let back: DiagnosisType = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, DiagnosisType::SelfReported);
    }
}
