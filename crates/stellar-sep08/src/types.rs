//! SEP-0008 data types: configuration, regulated asset descriptors and the
//! classified replies of the approval and action endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stellar_primitives::PublicKey;
use stellar_transaction::Asset;

use crate::error::Sep08Error;

/// Configuration for a [`RegulatedAssetsService`](crate::RegulatedAssetsService).
#[derive(Debug, Clone)]
pub struct Sep08Config {
    /// Per-request timeout for approval and action calls.
    pub timeout: Duration,
}

impl Default for Sep08Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// A regulated asset as advertised by its issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatedAsset {
    /// Asset code, 1 to 12 characters.
    pub code: String,
    /// `G…` account id of the issuer.
    pub issuer: String,
    /// URL that approves transactions involving the asset.
    pub approval_server: String,
    /// Human readable description of what the issuer approves.
    #[serde(default)]
    pub approval_criteria: Option<String>,
}

impl RegulatedAsset {
    /// The ledger asset this descriptor names.
    pub fn to_asset(&self) -> Result<Asset, Sep08Error> {
        let issuer = PublicKey::from_account_id(&self.issuer)
            .map_err(|e| Sep08Error::InvalidAsset(format!("issuer {:?}: {}", self.issuer, e)))?;
        Asset::credit(&self.code, issuer).map_err(|e| Sep08Error::InvalidAsset(e.to_string()))
    }
}

/// Outcome of posting a transaction to an approval server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Approved unchanged and signed by the issuer.
    Success {
        /// Signed envelope (base64) to submit.
        tx: String,
        /// Optional note for the user.
        message: Option<String>,
    },
    /// Approved after the server rewrote the transaction.
    Revised {
        /// Revised, signed envelope (base64). Not assumed equal to the submitted one.
        tx: String,
        /// Explanation of the revision.
        message: String,
    },
    /// Not decided yet; try again after `timeout` seconds.
    Pending {
        /// Seconds to wait before resubmitting. Zero means unknown.
        timeout: u64,
        /// Optional note for the user.
        message: Option<String>,
    },
    /// Refused.
    Rejected {
        /// Reason given by the server.
        error: String,
    },
    /// The user must supply more information before approval.
    ActionRequired {
        /// What is needed.
        message: String,
        /// Where to go or post the fields.
        action_url: String,
        /// `GET` or `POST`.
        action_method: String,
        /// Names of the fields the server wants posted.
        action_fields: Vec<String>,
    },
}

/// Outcome of posting action fields to an `action_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing more to do; resubmit the transaction for approval.
    Done,
    /// The user must continue at another URL.
    NextUrl {
        /// URL to open.
        next_url: String,
        /// Optional note for the user.
        message: Option<String>,
    },
}

/// Request body for the approval endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ApprovalRequest<'a> {
    pub tx: &'a str,
}

#[derive(Deserialize)]
struct SuccessReply {
    tx: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RevisedReply {
    tx: String,
    message: String,
}

#[derive(Deserialize)]
struct PendingReply {
    timeout: u64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RejectedReply {
    error: String,
}

#[derive(Deserialize)]
struct ActionRequiredReply {
    message: String,
    action_url: String,
    #[serde(default)]
    action_method: Option<String>,
    #[serde(default)]
    action_fields: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct NextUrlReply {
    next_url: String,
    #[serde(default)]
    message: Option<String>,
}

impl ApprovalOutcome {
    /// Classify an approval server reply body.
    ///
    /// The `status` field picks the shape, then the whole body is decoded as
    /// that shape. The HTTP status code plays no part.
    ///
    /// # Returns
    /// `UnrecognizedApprovalResponse` when the body is not a JSON object or
    /// `status` is missing or unknown, `MalformedApprovalPayload` when a
    /// required field of the chosen shape is missing or mistyped.
    pub fn from_json(body: &str) -> Result<Self, Sep08Error> {
        let (status, value) = peek_discriminant(body, "status")?;
        match status.as_str() {
            "success" => {
                let r: SuccessReply = decode_shape(value, "success")?;
                Ok(ApprovalOutcome::Success {
                    tx: r.tx,
                    message: r.message,
                })
            }
            "revised" => {
                let r: RevisedReply = decode_shape(value, "revised")?;
                Ok(ApprovalOutcome::Revised {
                    tx: r.tx,
                    message: r.message,
                })
            }
            "pending" => {
                let r: PendingReply = decode_shape(value, "pending")?;
                Ok(ApprovalOutcome::Pending {
                    timeout: r.timeout,
                    message: r.message,
                })
            }
            "rejected" => {
                let r: RejectedReply = decode_shape(value, "rejected")?;
                Ok(ApprovalOutcome::Rejected { error: r.error })
            }
            "action_required" => {
                let r: ActionRequiredReply = decode_shape(value, "action_required")?;
                Ok(ApprovalOutcome::ActionRequired {
                    message: r.message,
                    action_url: r.action_url,
                    action_method: r.action_method.unwrap_or_else(|| "GET".to_string()),
                    action_fields: r.action_fields.unwrap_or_default(),
                })
            }
            other => Err(Sep08Error::UnrecognizedApprovalResponse(format!(
                "unknown status {:?}",
                other
            ))),
        }
    }

    /// The `status` string this outcome was classified from.
    pub fn status(&self) -> &'static str {
        match self {
            ApprovalOutcome::Success { .. } => "success",
            ApprovalOutcome::Revised { .. } => "revised",
            ApprovalOutcome::Pending { .. } => "pending",
            ApprovalOutcome::Rejected { .. } => "rejected",
            ApprovalOutcome::ActionRequired { .. } => "action_required",
        }
    }
}

impl ActionOutcome {
    /// Classify an action endpoint reply body by its `result` field.
    pub fn from_json(body: &str) -> Result<Self, Sep08Error> {
        let (result, value) = peek_discriminant(body, "result")?;
        match result.as_str() {
            "no_further_action_required" => Ok(ActionOutcome::Done),
            "follow_next_url" => {
                let r: NextUrlReply = decode_shape(value, "follow_next_url")?;
                Ok(ActionOutcome::NextUrl {
                    next_url: r.next_url,
                    message: r.message,
                })
            }
            other => Err(Sep08Error::UnrecognizedApprovalResponse(format!(
                "unknown result {:?}",
                other
            ))),
        }
    }
}

/// First phase: parse to a JSON object and read its string discriminant.
fn peek_discriminant(body: &str, field: &str) -> Result<(String, Value), Sep08Error> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Sep08Error::UnrecognizedApprovalResponse(format!("body is not JSON: {}", e)))?;
    let tag = value
        .as_object()
        .and_then(|obj| obj.get(field))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Sep08Error::UnrecognizedApprovalResponse(format!("missing {:?} field", field))
        })?;
    Ok((tag, value))
}

/// Second phase: decode the body as the shape the discriminant selected.
fn decode_shape<T: DeserializeOwned>(value: Value, shape: &str) -> Result<T, Sep08Error> {
    serde_json::from_value(value)
        .map_err(|e| Sep08Error::MalformedApprovalPayload(format!("{} reply: {}", shape, e)))
}
