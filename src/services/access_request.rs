use color_eyre::Result;

use crate::db::Db;
use crate::email::ResendMailer;
use crate::names;

// ---------------------------------------------------------------------------
// Repository / mailer traits (the service defines the abstractions it needs)
// ---------------------------------------------------------------------------

/// The matching active code for a requesting email address.
#[derive(Debug, Clone)]
pub struct CodeDelivery {
    pub code: String,
    pub student_name: Option<String>,
    pub email: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait CodeRepository: Send + Sync {
    fn count_recent_code_requests_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn count_recent_code_requests_by_address(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn log_code_request(
        &self,
        email: &str,
        address: Option<String>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn find_active_code_for_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<CodeDelivery>>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait CodeMailer: Send + Sync {
    /// Whether sending is configured (false in dev mode).
    fn is_enabled(&self) -> bool;

    fn send_access_code_email(
        &self,
        to_email: &str,
        student_name: &str,
        code: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// AccessRequestService
// ---------------------------------------------------------------------------

/// Self-service access-code delivery: a student enters their email and, if
/// a matching active code exists and the rate limits allow it, the code is
/// mailed out. The caller is always told the same thing regardless of what
/// happened, so the form cannot be used to probe which addresses exist.
pub struct AccessRequestService<R: CodeRepository = Db, M: CodeMailer = ResendMailer> {
    repo: R,
    mailer: M,
}

impl<R: CodeRepository + Clone, M: CodeMailer + Clone> Clone for AccessRequestService<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
        }
    }
}

impl<R: CodeRepository, M: CodeMailer> AccessRequestService<R, M> {
    pub fn new(repo: R, mailer: M) -> Self {
        Self { repo, mailer }
    }

    /// Handle one request. Never fails from the caller's perspective;
    /// everything noteworthy goes to the log.
    pub async fn request_code(&self, email: &str, address: Option<&str>) {
        if let Err(e) = self.try_request(email, address).await {
            tracing::error!("access code request failed internally: {e}");
        }
    }

    async fn try_request(&self, email: &str, address: Option<&str>) -> Result<()> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(());
        }

        let by_email = self.repo.count_recent_code_requests_by_email(&email).await?;
        let by_address = match address {
            Some(address) => {
                self.repo
                    .count_recent_code_requests_by_address(address)
                    .await?
            }
            None => 0,
        };

        // Every attempt is logged, including blocked ones (audit trail).
        self.repo
            .log_code_request(&email, address.map(str::to_string))
            .await?;

        if by_email >= names::CODE_REQUESTS_PER_EMAIL
            || by_address >= names::CODE_REQUESTS_PER_ADDRESS
        {
            tracing::warn!("access code request rate limited");
            return Ok(());
        }

        let Some(delivery) = self.repo.find_active_code_for_email(&email).await? else {
            return Ok(());
        };

        if !self.mailer.is_enabled() {
            tracing::warn!("access code requested but no mailer is configured");
            return Ok(());
        }

        if let Err(e) = self
            .mailer
            .send_access_code_email(
                &delivery.email,
                delivery.student_name.as_deref().unwrap_or(""),
                &delivery.code,
            )
            .await
        {
            // Delivery failures must not change the response either.
            tracing::error!("could not send access code email: {e}");
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mailer_enabled() -> MockCodeMailer {
        let mut mock = MockCodeMailer::new();
        mock.expect_is_enabled().returning(|| true);
        mock
    }

    fn delivery() -> CodeDelivery {
        CodeDelivery {
            code: "BRAV-PFOTE-123".to_string(),
            student_name: Some("Alex".to_string()),
            email: "alex@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_email_touches_nothing() {
        // No expectations set: any repo or mailer call would panic.
        let svc = AccessRequestService::new(MockCodeRepository::new(), MockCodeMailer::new());
        svc.request_code("   ", None).await;
    }

    #[tokio::test]
    async fn sends_code_for_matching_email() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_count_recent_code_requests_by_address()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_log_code_request()
            .withf(|email, _| email == "alex@example.com")
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_find_active_code_for_email()
            .returning(|_| Box::pin(async { Ok(Some(delivery())) }));

        let mut mailer = mailer_enabled();
        mailer
            .expect_send_access_code_email()
            .withf(|to, name, code| {
                to == "alex@example.com" && name == "Alex" && code == "BRAV-PFOTE-123"
            })
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let svc = AccessRequestService::new(repo, mailer);
        // Uppercase and padding are normalized away before the lookup.
        svc.request_code("  Alex@Example.com ", Some("203.0.113.7")).await;
    }

    #[tokio::test]
    async fn email_rate_limit_blocks_lookup_but_still_logs() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(names::CODE_REQUESTS_PER_EMAIL) }));
        repo.expect_log_code_request()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        // find_active_code_for_email has no expectation: calling it panics.

        let svc = AccessRequestService::new(repo, MockCodeMailer::new());
        svc.request_code("alex@example.com", None).await;
    }

    #[tokio::test]
    async fn address_rate_limit_blocks_lookup() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_count_recent_code_requests_by_address()
            .returning(|_| Box::pin(async { Ok(names::CODE_REQUESTS_PER_ADDRESS) }));
        repo.expect_log_code_request()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = AccessRequestService::new(repo, MockCodeMailer::new());
        svc.request_code("alex@example.com", Some("203.0.113.7"))
            .await;
    }

    #[tokio::test]
    async fn unknown_email_sends_nothing() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_log_code_request()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_find_active_code_for_email()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = AccessRequestService::new(repo, MockCodeMailer::new());
        svc.request_code("niemand@example.com", None).await;
    }

    #[tokio::test]
    async fn send_failure_is_swallowed() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_log_code_request()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_find_active_code_for_email()
            .returning(|_| Box::pin(async { Ok(Some(delivery())) }));

        let mut mailer = mailer_enabled();
        mailer
            .expect_send_access_code_email()
            .returning(|_, _, _| Box::pin(async { Err(color_eyre::eyre::eyre!("send failed")) }));

        let svc = AccessRequestService::new(repo, mailer);
        svc.request_code("alex@example.com", None).await;
    }

    #[tokio::test]
    async fn disabled_mailer_short_circuits() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Ok(0) }));
        repo.expect_log_code_request()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_find_active_code_for_email()
            .returning(|_| Box::pin(async { Ok(Some(delivery())) }));

        let mut mailer = MockCodeMailer::new();
        mailer.expect_is_enabled().returning(|| false);
        // send_access_code_email has no expectation: calling it panics.

        let svc = AccessRequestService::new(repo, mailer);
        svc.request_code("alex@example.com", None).await;
    }

    #[tokio::test]
    async fn repo_failure_never_escapes() {
        let mut repo = MockCodeRepository::new();
        repo.expect_count_recent_code_requests_by_email()
            .returning(|_| Box::pin(async { Err(color_eyre::eyre::eyre!("db down")) }));

        let svc = AccessRequestService::new(repo, MockCodeMailer::new());
        svc.request_code("alex@example.com", None).await;
    }
}
