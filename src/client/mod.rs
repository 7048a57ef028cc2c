use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::{FinancialProfile, SimulationRequest};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status; `detail` is the
    /// message from its `{"detail": ...}` body when one was given.
    #[error("backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Everything the app needs from the backend, behind one seam so the
/// orchestration layer can be exercised against a fake in tests.
#[async_trait]
pub trait PlannerBackend: Send + Sync {
    /// `None` when the user has not completed onboarding yet.
    async fn fetch_profile(&self, user_id: u64) -> Result<Option<FinancialProfile>, ClientError>;
    async fn save_profile(
        &self,
        user_id: u64,
        profile: &FinancialProfile,
    ) -> Result<(), ClientError>;
    /// Returns the raw simulation body; shaping it is the mapper's job.
    async fn simulate(&self, request: &SimulationRequest) -> Result<Value, ClientError>;
    /// Accounts are keyed by email at login.
    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError>;
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_pwd: &str,
    ) -> Result<(), ClientError>;
}

#[derive(Debug, Serialize)]
struct SaveProfileBody<'a> {
    user_id: u64,
    #[serde(flatten)]
    profile: &'a FinancialProfile,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    confirm_pwd: &'a str,
}

#[derive(Debug, Deserialize)]
struct BackendDetail {
    detail: String,
}

/// Collection endpoints are declared slash-terminated on the backend; the
/// exact path avoids a 307 redirect on every write.
const SAVE_PROFILE_PATH: &str = "/financial-setting/";
const LOGIN_PATH: &str = "/user/login";
const REGISTER_PATH: &str = "/user/register";

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn backend_error(response: reqwest::Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let detail = match response.json::<BackendDetail>().await {
        Ok(body) => body.detail,
        Err(_) => fallback.to_string(),
    };
    ClientError::Backend { status, detail }
}

#[async_trait]
impl PlannerBackend for HttpBackend {
    async fn fetch_profile(&self, user_id: u64) -> Result<Option<FinancialProfile>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/financial-setting/{user_id}")))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(backend_error(response, "Failed to load financial settings.").await);
        }
        Ok(Some(response.json::<FinancialProfile>().await?))
    }

    async fn save_profile(
        &self,
        user_id: u64,
        profile: &FinancialProfile,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(SAVE_PROFILE_PATH))
            .json(&SaveProfileBody { user_id, profile })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(backend_error(response, "Failed to save financial settings.").await);
        }
        Ok(())
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(self.url("/simulate"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(backend_error(response, "Simulation failed.").await);
        }
        Ok(response.json::<Value>().await?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            // Deliberately the same message whether the email or the password
            // was wrong.
            return Err(ClientError::Backend {
                status: response.status().as_u16(),
                detail: "Invalid email or password.".to_string(),
            });
        }
        Ok(response.json::<Session>().await?)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_pwd: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .json(&RegisterBody {
                username,
                email,
                password,
                confirm_pwd,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(backend_error(response, "Registration failed.").await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Expense, Investment, InvestmentKind, RiskMode};

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let backend = HttpBackend::new("http://127.0.0.1:8000/");
        assert_eq!(
            backend.url("/financial-setting/7"),
            "http://127.0.0.1:8000/financial-setting/7"
        );
    }

    #[test]
    fn save_posts_to_the_slash_terminated_collection_path() {
        let backend = HttpBackend::new("http://127.0.0.1:8000");
        assert_eq!(
            backend.url(SAVE_PROFILE_PATH),
            "http://127.0.0.1:8000/financial-setting/"
        );
    }

    #[test]
    fn auth_endpoints_live_under_the_user_router() {
        let backend = HttpBackend::new("http://127.0.0.1:8000");
        assert_eq!(backend.url(LOGIN_PATH), "http://127.0.0.1:8000/user/login");
        assert_eq!(
            backend.url(REGISTER_PATH),
            "http://127.0.0.1:8000/user/register"
        );
    }

    #[test]
    fn login_body_is_email_keyed() {
        let body = serde_json::to_value(LoginBody {
            email: "mika@example.com",
            password: "pw",
        })
        .expect("body should serialize");
        assert_eq!(body["email"], "mika@example.com");
        assert_eq!(body["password"], "pw");
        assert!(body.get("username").is_none());
    }

    #[test]
    fn register_body_carries_email_and_confirmation() {
        let body = serde_json::to_value(RegisterBody {
            username: "mika",
            email: "mika@example.com",
            password: "pw",
            confirm_pwd: "pw",
        })
        .expect("body should serialize");
        assert_eq!(body["username"], "mika");
        assert_eq!(body["email"], "mika@example.com");
        assert_eq!(body["password"], "pw");
        assert_eq!(body["confirmPwd"], "pw");
        assert!(body.get("confirm_pwd").is_none());
    }

    #[test]
    fn save_body_flattens_the_profile_next_to_the_user_id() {
        let profile = FinancialProfile {
            total_asset: 100_000.0,
            monthly_income: 50_000.0,
            expenses: vec![Expense {
                category: "food".to_string(),
                amount: 20_000.0,
            }],
            investments: vec![Investment {
                kind: InvestmentKind::Stocks,
                amount: 4_000.0,
            }],
            risk_mode: RiskMode::Fixed,
            fixed_return: Some(5.0),
        };
        let body = serde_json::to_value(SaveProfileBody {
            user_id: 7,
            profile: &profile,
        })
        .expect("body should serialize");

        assert_eq!(body["user_id"], 7);
        assert_eq!(body["totalAsset"], 100_000.0);
        assert_eq!(body["monthlyIncome"], 50_000.0);
        assert_eq!(body["riskMode"], "fixed");
        assert_eq!(body["fixedReturn"], 5.0);
        assert_eq!(body["expenses"][0]["category"], "food");
        assert_eq!(body["investments"][0]["type"], "stocks");
        // No nesting under a "profile" key.
        assert!(body.get("profile").is_none());
    }

    #[test]
    fn fetched_profile_round_trips_field_for_field() {
        let profile = FinancialProfile {
            total_asset: 250_000.0,
            monthly_income: 42_000.0,
            expenses: vec![Expense {
                category: "rent".to_string(),
                amount: 15_000.0,
            }],
            investments: vec![Investment {
                kind: InvestmentKind::Etf,
                amount: 6_000.0,
            }],
            risk_mode: RiskMode::High,
            fixed_return: None,
        };
        let wire = serde_json::to_string(&profile).expect("profile should serialize");
        let fetched: FinancialProfile =
            serde_json::from_str(&wire).expect("profile should deserialize");
        assert_eq!(fetched, profile);
    }
}
