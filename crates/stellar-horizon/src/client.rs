//! Horizon HTTP client for submitting transactions and loading accounts.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Response, StatusCode};
use stellar_primitives::PublicKey;
use stellar_transaction::{Account, Transaction, TransactionResult, XdrCodec};
use tracing::{debug, info, warn};

use crate::error::HorizonError;
use crate::types::{
    AccountResponse, HorizonConfig, Problem, SubmissionResult, SubmitTransactionBody,
    SubmitTransactionResponse, TransactionFailure,
};

/// HTTP client for the parts of the Horizon API the SDK needs.
///
/// Each call is a single request with no retries; the only shared state is
/// the `reqwest` connection pool, so the client is cheap to clone.
#[derive(Debug, Clone)]
pub struct HorizonClient {
    /// Client configuration.
    config: HorizonConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl HorizonClient {
    /// Create a new Horizon client with the given configuration.
    pub fn new(config: HorizonConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a client that shares an existing `reqwest::Client`.
    pub fn with_client(mut config: HorizonConfig, client: reqwest::Client) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config, client }
    }

    /// The configuration in use.
    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    /// Submit a base64 transaction envelope to `POST /transactions`.
    ///
    /// # Returns
    /// `SubmissionResult::Success` when the transaction was applied,
    /// `SubmissionResult::TransactionFailed` when Horizon reports result
    /// codes (with `result` left empty if `result_xdr` does not decode),
    /// `HorizonError::Problem` for any other error document and
    /// `HorizonError::Transport` when no usable response arrived.
    pub async fn submit_transaction_envelope(
        &self,
        envelope_base64: &str,
    ) -> Result<SubmissionResult, HorizonError> {
        let url = format!("{}/transactions", self.config.base_url);
        debug!(%url, "submitting transaction");

        let resp = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .timeout(self.config.timeout)
            .form(&[("tx", envelope_base64)])
            .send()
            .await?;

        if resp.status().is_success() {
            let body: SubmitTransactionBody = resp.json().await?;
            let response = SubmitTransactionResponse::from_body(body)?;
            info!(hash = %response.hash, ledger = ?response.ledger, "transaction applied");
            return Ok(SubmissionResult::Success(response));
        }

        let status = resp.status();
        let problem = Self::read_problem(resp).await?;
        match problem.extras.as_ref().and_then(|e| e.result_codes.clone()) {
            Some(result_codes) => {
                warn!(%status, codes = %result_codes, "transaction failed");
                let extras = problem.extras.unwrap_or_default();
                let result = match extras.result_xdr {
                    Some(xdr) => match TransactionResult::from_xdr_base64(&xdr) {
                        Ok(result) => Some(result),
                        Err(e) => {
                            warn!(error = %e, "result_xdr of failed transaction could not be decoded");
                            None
                        }
                    },
                    None => None,
                };
                Ok(SubmissionResult::TransactionFailed(TransactionFailure {
                    result_codes,
                    result,
                    envelope_xdr: extras.envelope_xdr,
                }))
            }
            None => Err(Self::problem_error(status, problem)),
        }
    }

    /// Submit a transaction, normally already signed, as its base64 envelope.
    pub async fn submit_transaction(&self, tx: &Transaction) -> Result<SubmissionResult, HorizonError> {
        let envelope = tx.to_envelope_xdr_base64()?;
        self.submit_transaction_envelope(&envelope).await
    }

    /// Fetch an account record from `GET /accounts/{id}`.
    ///
    /// # Returns
    /// `HorizonError::NotFound` when the account does not exist.
    pub async fn account(&self, account_id: &str) -> Result<AccountResponse, HorizonError> {
        PublicKey::from_account_id(account_id)
            .map_err(|e| HorizonError::InvalidRequest(format!("account id {:?}: {}", account_id, e)))?;
        let url = format!("{}/accounts/{}", self.config.base_url, account_id);
        debug!(%url, "loading account");

        let resp = self
            .client
            .get(&url)
            .headers(self.build_headers())
            .timeout(self.config.timeout)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json().await?),
            StatusCode::NOT_FOUND => Err(HorizonError::NotFound(format!("account {}", account_id))),
            status => {
                let problem = Self::read_problem(resp).await?;
                Err(Self::problem_error(status, problem))
            }
        }
    }

    /// Fetch an account and return it as an [`Account`] for the builder.
    pub async fn load_account(&self, account_id: &str) -> Result<Account, HorizonError> {
        let record = self.account(account_id).await?;
        let account = record.to_account()?;
        debug!(account = %account_id, sequence = account.sequence_number, "loaded account");
        Ok(account)
    }

    async fn read_problem(resp: Response) -> Result<Problem, HorizonError> {
        Ok(resp.json().await?)
    }

    fn problem_error(status: StatusCode, problem: Problem) -> HorizonError {
        warn!(%status, kind = %problem.kind, title = %problem.title, "horizon problem");
        HorizonError::Problem {
            status: if problem.status != 0 { problem.status } else { status.as_u16() },
            title: problem.title,
            detail: problem.detail.unwrap_or_default(),
        }
    }

    /// Build common headers from config.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref name) = self.config.client_name {
            if let Ok(val) = HeaderValue::from_str(name) {
                headers.insert("X-Client-Name", val);
            }
        }

        if let Some(ref version) = self.config.client_version {
            if let Ok(val) = HeaderValue::from_str(version) {
                headers.insert("X-Client-Version", val);
            }
        }

        headers
    }
}
