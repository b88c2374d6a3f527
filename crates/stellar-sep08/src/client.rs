//! SEP-0008 client: issuer authorization checks, approval requests and
//! follow-up actions.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::{Map, Value};
use stellar_horizon::{AccountResponse, HorizonClient, HorizonError};
use tracing::{debug, info, warn};

use crate::error::Sep08Error;
use crate::types::{ActionOutcome, ApprovalOutcome, ApprovalRequest, RegulatedAsset, Sep08Config};

/// Source of issuer account records.
pub trait IssuerAccountSource {
    /// Load the account record of `account_id`.
    fn issuer_account(
        &self,
        account_id: &str,
    ) -> impl std::future::Future<Output = Result<AccountResponse, HorizonError>> + Send;
}

impl IssuerAccountSource for HorizonClient {
    async fn issuer_account(&self, account_id: &str) -> Result<AccountResponse, HorizonError> {
        self.account(account_id).await
    }
}

/// Drives the approval protocol for regulated assets.
///
/// Every call is one request and returns one outcome. Sequencing the
/// approval, action and resubmission steps is left to the caller.
#[derive(Debug, Clone)]
pub struct RegulatedAssetsService<S> {
    /// Client configuration.
    config: Sep08Config,
    /// Issuer account lookup.
    issuers: S,
    /// Known regulated assets.
    assets: Vec<RegulatedAsset>,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl<S: IssuerAccountSource> RegulatedAssetsService<S> {
    /// Create a service that looks issuers up through `issuers`.
    pub fn new(config: Sep08Config, issuers: S) -> Self {
        Self {
            config,
            issuers,
            assets: Vec::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Register the regulated assets this service knows about.
    pub fn with_assets(mut self, assets: Vec<RegulatedAsset>) -> Self {
        self.assets = assets;
        self
    }

    /// The registered regulated assets.
    pub fn regulated_assets(&self) -> &[RegulatedAsset] {
        &self.assets
    }

    /// Find a registered asset by code and issuer.
    pub fn find_asset(&self, code: &str, issuer: &str) -> Option<&RegulatedAsset> {
        self.assets
            .iter()
            .find(|a| a.code == code && a.issuer == issuer)
    }

    /// Whether the issuer has the `auth_required` flag set.
    ///
    /// # Arguments
    /// * `issuer` - `G…` account id of the asset issuer.
    pub async fn authorization_required(&self, issuer: &str) -> Result<bool, Sep08Error> {
        let account = self.issuers.issuer_account(issuer).await?;
        debug!(%issuer, flags = account.flags.bits(), "issuer flags");
        Ok(account.flags.auth_required)
    }

    /// Post a transaction to an approval server.
    ///
    /// # Arguments
    /// * `envelope_base64` - The signed transaction envelope.
    /// * `approval_server` - The asset's approval URL.
    ///
    /// # Returns
    /// The classified reply. Replies are classified by their body whatever
    /// the HTTP status, so a 400 carrying `rejected` is `Ok(Rejected)`.
    pub async fn post_transaction(
        &self,
        envelope_base64: &str,
        approval_server: &str,
    ) -> Result<ApprovalOutcome, Sep08Error> {
        debug!(url = %approval_server, "posting transaction for approval");

        let resp = self
            .client
            .post(approval_server)
            .headers(self.build_headers())
            .timeout(self.config.timeout)
            .json(&ApprovalRequest { tx: envelope_base64 })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match ApprovalOutcome::from_json(&body) {
            Ok(outcome) => {
                info!(url = %approval_server, %status, outcome = outcome.status(), "approval reply");
                Ok(outcome)
            }
            Err(e) => {
                warn!(url = %approval_server, %status, error = %e, "unusable approval reply");
                Err(e)
            }
        }
    }

    /// Post the requested fields to an `action_url`.
    ///
    /// # Arguments
    /// * `action_url` - URL from an `ActionRequired` or `NextUrl` outcome.
    /// * `fields` - Field values keyed by the names the server asked for.
    pub async fn post_action(
        &self,
        action_url: &str,
        fields: &Map<String, Value>,
    ) -> Result<ActionOutcome, Sep08Error> {
        debug!(url = %action_url, fields = fields.len(), "posting action fields");

        let resp = self
            .client
            .post(action_url)
            .headers(self.build_headers())
            .timeout(self.config.timeout)
            .json(fields)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match ActionOutcome::from_json(&body) {
            Ok(outcome) => {
                info!(url = %action_url, %status, ?outcome, "action reply");
                Ok(outcome)
            }
            Err(e) => {
                warn!(url = %action_url, %status, error = %e, "unusable action reply");
                Err(e)
            }
        }
    }

    /// Build common headers.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}
