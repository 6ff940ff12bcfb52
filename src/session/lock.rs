//! Password-backed lock state machine.
//!
//! Only a one-way verification hash of the password is ever kept; the
//! password itself is neither stored nor logged.

use crate::config::Settings;
use crate::error::{Error, Result};
use log::info;
use sha2::{Digest, Sha256};

/// Salt mixed into every password hash.
const PASSWORD_SALT: &str = "inkpad.lock.v1:";

/// Hex-encoded SHA-256 of the salted password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PASSWORD_SALT.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Validate a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str, min_len: usize) -> Result<()> {
    if password.is_empty() {
        return Err(Error::Validation("Please enter a password".to_string()));
    }
    let min_len = min_len.max(Settings::MIN_PASSWORD_LEN);
    if password.chars().count() < min_len {
        return Err(Error::Validation(format!(
            "Password must be at least {} characters",
            min_len
        )));
    }
    if password != confirm {
        return Err(Error::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No password has been set
    NoPassword,
    /// Password set, content visible and editable
    Unlocked,
    /// Content hidden, only the password prompt is shown
    Locked,
}

impl LockState {
    pub fn has_password(self) -> bool {
        !matches!(self, LockState::NoPassword)
    }
}

/// Lock state plus the stored verification hash.
///
/// The gate only decides transitions; persisting `passwordHash` and
/// `isLocked` is left to the session, which must complete those writes
/// before it calls the matching `mark_*` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockGate {
    hash: Option<String>,
    state: LockState,
}

impl Default for LockGate {
    fn default() -> Self {
        Self {
            hash: None,
            state: LockState::NoPassword,
        }
    }
}

impl LockGate {
    /// Rebuild the gate from stored fields. A lock flag without a hash is
    /// ignored, since there would be no way to unlock.
    pub fn from_stored(hash: Option<String>, is_locked: bool) -> Self {
        let hash = hash.filter(|h| !h.is_empty());
        let state = match (&hash, is_locked) {
            (None, _) => LockState::NoPassword,
            (Some(_), true) => LockState::Locked,
            (Some(_), false) => LockState::Unlocked,
        };
        Self { hash, state }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    pub fn has_password(&self) -> bool {
        self.hash.is_some()
    }

    /// Whether `password` matches the stored hash.
    pub fn verify(&self, password: &str) -> bool {
        self.hash
            .as_deref()
            .is_some_and(|hash| hash == hash_password(password))
    }

    /// Check `setPassword` preconditions and return the hash to persist.
    pub fn prepare_password(&self, password: &str, confirm: &str, min_len: usize) -> Result<String> {
        if self.state != LockState::NoPassword {
            return Err(Error::Validation("A password is already set".to_string()));
        }
        validate_new_password(password, confirm, min_len)?;
        Ok(hash_password(password))
    }

    /// Record a persisted hash: `NoPassword -> Unlocked`.
    pub fn mark_password_set(&mut self, hash: String) {
        self.hash = Some(hash);
        self.state = LockState::Unlocked;
        info!("Password set");
    }

    /// Check `lock` preconditions.
    pub fn check_can_lock(&self) -> Result<()> {
        match self.state {
            LockState::NoPassword => Err(Error::Validation(
                "Set a password before locking".to_string(),
            )),
            LockState::Locked => Err(Error::Locked),
            LockState::Unlocked => Ok(()),
        }
    }

    /// `Unlocked -> Locked`, after content and `isLocked` are persisted.
    pub fn mark_locked(&mut self) {
        self.state = LockState::Locked;
        info!("Editor locked");
    }

    /// Check `unlock` preconditions; a wrong password leaves the state alone.
    pub fn check_unlock(&self, password: &str) -> Result<()> {
        if self.state != LockState::Locked {
            return Err(Error::Validation("Editor is not locked".to_string()));
        }
        if !self.verify(password) {
            return Err(Error::Auth("Incorrect password".to_string()));
        }
        Ok(())
    }

    /// `Locked -> Unlocked`, after `isLocked=false` is persisted.
    pub fn mark_unlocked(&mut self) {
        self.state = LockState::Unlocked;
        info!("Editor unlocked");
    }

    /// Check `removePassword` preconditions.
    pub fn check_remove(&self, password: &str) -> Result<()> {
        match self.state {
            LockState::NoPassword => Err(Error::Validation("No password is set".to_string())),
            LockState::Locked => Err(Error::Locked),
            LockState::Unlocked if !self.verify(password) => {
                Err(Error::Auth("Incorrect password".to_string()))
            }
            LockState::Unlocked => Ok(()),
        }
    }

    /// `Unlocked -> NoPassword`, after both keys are cleared.
    pub fn mark_password_removed(&mut self) {
        self.hash = None;
        self.state = LockState::NoPassword;
        info!("Password removed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked_with(password: &str) -> LockGate {
        let mut gate = LockGate::default();
        let hash = gate.prepare_password(password, password, 4).unwrap();
        gate.mark_password_set(hash);
        gate
    }

    #[test]
    fn test_hash_is_hex_and_deterministic() {
        let hash = hash_password("abcd");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_password("abcd"));
        assert_ne!(hash, hash_password("abce"));
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_new_password("abcd", "abcd", 4).is_ok());
        assert!(matches!(
            validate_new_password("abc", "abc", 4),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_new_password("abcd", "abce", 4),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_new_password("", "", 4),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_min_length_never_below_four() {
        assert!(validate_new_password("abc", "abc", 1).is_err());
        assert!(validate_new_password("abcdef", "abcdef", 8).is_err());
    }

    #[test]
    fn test_from_stored_states() {
        assert_eq!(LockGate::from_stored(None, false).state(), LockState::NoPassword);
        assert_eq!(LockGate::from_stored(None, true).state(), LockState::NoPassword);
        assert_eq!(
            LockGate::from_stored(Some(hash_password("abcd")), true).state(),
            LockState::Locked
        );
        assert_eq!(
            LockGate::from_stored(Some(hash_password("abcd")), false).state(),
            LockState::Unlocked
        );
    }

    #[test]
    fn test_full_cycle() {
        let mut gate = unlocked_with("abcd");
        assert_eq!(gate.state(), LockState::Unlocked);

        gate.check_can_lock().unwrap();
        gate.mark_locked();
        assert!(gate.is_locked());

        assert!(matches!(gate.check_unlock("nope"), Err(Error::Auth(_))));
        assert!(gate.is_locked());

        gate.check_unlock("abcd").unwrap();
        gate.mark_unlocked();

        assert!(matches!(gate.check_remove("nope"), Err(Error::Auth(_))));
        gate.check_remove("abcd").unwrap();
        gate.mark_password_removed();
        assert_eq!(gate.state(), LockState::NoPassword);
        assert!(!gate.has_password());
    }

    #[test]
    fn test_cannot_lock_without_password() {
        let gate = LockGate::default();
        assert!(matches!(gate.check_can_lock(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_cannot_set_password_twice() {
        let gate = unlocked_with("abcd");
        assert!(gate.prepare_password("efgh", "efgh", 4).is_err());
    }
}
