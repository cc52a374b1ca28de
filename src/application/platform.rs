use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use crate::application::{AppResult, ConfigurationError, Cooldown, SubjectResolver};
use crate::domain::SubjectKey;

/// A [`Cooldown`] addressed through platform objects instead of keys.
///
/// Every call resolves the subject first and fails with
/// [`ConfigurationError::UnresolvedSubject`] if the resolver has no key for it.
pub struct PlatformCooldown<P: ?Sized, R> {
    cooldown: Cooldown,
    resolver: R,
    _subject: PhantomData<fn(&P)>,
}

impl<P, R> PlatformCooldown<P, R>
where
    P: fmt::Debug + ?Sized,
    R: SubjectResolver<P>,
{
    pub fn new(cooldown: Cooldown, resolver: R) -> Self {
        Self {
            cooldown,
            resolver,
            _subject: PhantomData,
        }
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn key_of(&self, subject: &P) -> AppResult<SubjectKey> {
        self.resolver.resolve(subject).ok_or_else(|| {
            ConfigurationError::UnresolvedSubject {
                subject: format!("{subject:?}"),
            }
            .into()
        })
    }

    pub fn put(&self, subject: &P, duration: Duration) -> AppResult<()> {
        self.cooldown.put(self.key_of(subject)?, duration);
        Ok(())
    }

    pub fn put_default(&self, subject: &P) -> AppResult<()> {
        self.cooldown.put_default(self.key_of(subject)?)
    }

    pub fn is_active(&self, subject: &P) -> AppResult<bool> {
        Ok(self.cooldown.is_active(&self.key_of(subject)?))
    }

    pub fn release(&self, subject: &P) -> AppResult<()> {
        self.cooldown.release(&self.key_of(subject)?);
        Ok(())
    }

    pub fn time_left(&self, subject: &P) -> AppResult<Option<Duration>> {
        Ok(self.cooldown.time_left(&self.key_of(subject)?))
    }

    pub async fn test(&self, subject: &P) -> AppResult<bool> {
        let key = self.key_of(subject)?;
        self.cooldown.test(key).await
    }
}
