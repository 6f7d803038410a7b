use chrono::{DateTime, Utc};
use rand::RngExt;

use nexza_domain::clock::Clock;
use nexza_domain::email::{looks_like_email, normalize_email};
use nexza_domain::window::{code_window, resend_window};

use crate::domain::repository::{CodeNotifier, VerificationCodeRepository};
use crate::domain::types::{CODE_LEN, CODE_MAX, CODE_MIN, VerificationCode, Versioned};
use crate::error::{CodeError, ConsoleError};

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Normalise and shape-check an address before it keys a code.
pub(crate) fn subject_from(email: &str) -> Result<String, ConsoleError> {
    let subject = normalize_email(email);
    if !looks_like_email(&subject) {
        return Err(ConsoleError::invalid_input("Please enter a valid email address"));
    }
    Ok(subject)
}

// ── Issue ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub subject: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
}

pub struct IssueCodeUseCase<R, N, C>
where
    R: VerificationCodeRepository,
    N: CodeNotifier,
    C: Clock,
{
    pub codes: R,
    pub notifier: N,
    pub clock: C,
}

impl<R, N, C> IssueCodeUseCase<R, N, C>
where
    R: VerificationCodeRepository,
    N: CodeNotifier,
    C: Clock,
{
    /// Overwrites any code the subject already had.
    pub async fn execute(&self, email: &str) -> Result<IssuedCode, ConsoleError> {
        let subject = subject_from(email)?;
        let now = self.clock.now();
        let record = VerificationCode {
            subject: subject.clone(),
            code: generate_code(),
            issued_at: now,
            expires_at: code_window(now).end(),
            consumed: false,
            consumed_at: None,
        };

        self.codes.put(&record).await?;
        self.notifier.deliver(&subject, &record.code).await?;

        Ok(IssuedCode {
            subject,
            code: record.code,
            issued_at: now,
            expires_at: record.expires_at,
            resend_available_at: resend_window(now).end(),
        })
    }
}

// ── Validate ──────────────────────────────────────────────────────────────────

/// Proof that a code was accepted and consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valid {
    pub subject: String,
    pub consumed_at: DateTime<Utc>,
}

/// A code that currently passes every check but is still unconsumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Rejections in order: missing, expired (the record is dropped), mismatch,
/// already consumed.
async fn check_record<R, C>(
    codes: &R,
    clock: &C,
    subject: &str,
    submitted: &str,
) -> Result<Versioned<VerificationCode>, ConsoleError>
where
    R: VerificationCodeRepository,
    C: Clock,
{
    let Some(found) = codes.find(subject).await? else {
        return Err(CodeError::NotFound.into());
    };

    if found.value.is_expired(clock.now()) {
        if let Err(e) = codes.delete(subject).await {
            tracing::warn!(error = %e, subject = %subject, "failed to drop expired code");
        }
        return Err(CodeError::Expired.into());
    }

    let submitted = submitted.trim();
    if !is_well_formed(submitted) || submitted != found.value.code {
        return Err(CodeError::Mismatch.into());
    }

    if found.value.consumed {
        return Err(CodeError::AlreadyConsumed.into());
    }

    Ok(found)
}

/// Check `submitted` against the subject's code and leave it unconsumed, so
/// the same code can still open a session afterwards.
pub async fn check_code<R, C>(
    codes: &R,
    clock: &C,
    email: &str,
    submitted: &str,
) -> Result<Checked, ConsoleError>
where
    R: VerificationCodeRepository,
    C: Clock,
{
    let subject = normalize_email(email);
    let found = check_record(codes, clock, &subject, submitted).await?;
    Ok(Checked {
        subject,
        expires_at: found.value.expires_at,
    })
}

/// Check `submitted` against the subject's code and consume it.
///
/// Consumption is a compare-and-set on the record version, so of two racing
/// correct submissions only one wins.
pub async fn validate_code<R, C>(
    codes: &R,
    clock: &C,
    email: &str,
    submitted: &str,
) -> Result<Valid, ConsoleError>
where
    R: VerificationCodeRepository,
    C: Clock,
{
    let subject = normalize_email(email);
    let Versioned {
        value: mut record,
        version,
    } = check_record(codes, clock, &subject, submitted).await?;

    let now = clock.now();
    record.consumed = true;
    record.consumed_at = Some(now);
    if !codes.replace(&record, version).await? {
        return Err(CodeError::AlreadyConsumed.into());
    }

    Ok(Valid {
        subject,
        consumed_at: now,
    })
}

pub struct CheckCodeUseCase<R, C>
where
    R: VerificationCodeRepository,
    C: Clock,
{
    pub codes: R,
    pub clock: C,
}

impl<R, C> CheckCodeUseCase<R, C>
where
    R: VerificationCodeRepository,
    C: Clock,
{
    pub async fn execute(&self, email: &str, submitted: &str) -> Result<Checked, ConsoleError> {
        check_code(&self.codes, &self.clock, email, submitted).await
    }
}
