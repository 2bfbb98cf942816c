use std::{
    collections::HashMap,
    env,
    ffi::{OsStr, OsString},
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
};

use zksync_settlement_types::H256;

/// Mutex guarding env variables changed by config tests. Changes are rolled back
/// when the corresponding [`EnvMutexGuard`] is dropped.
#[derive(Debug)]
pub(crate) struct EnvMutex(Mutex<()>);

impl EnvMutex {
    pub const fn new() -> Self {
        Self(Mutex::new(()))
    }

    pub fn lock(&self) -> EnvMutexGuard<'_> {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        EnvMutexGuard {
            _inner: guard,
            redefined_vars: HashMap::new(),
        }
    }
}

#[must_use = "Environment will be reset when the guard is dropped"]
#[derive(Debug)]
pub(crate) struct EnvMutexGuard<'a> {
    _inner: MutexGuard<'a, ()>,
    redefined_vars: HashMap<OsString, Option<OsString>>,
}

impl Drop for EnvMutexGuard<'_> {
    fn drop(&mut self) {
        for (env_name, value) in mem::take(&mut self.redefined_vars) {
            if let Some(value) = value {
                env::set_var(env_name, value);
            } else {
                env::remove_var(env_name);
            }
        }
    }
}

impl EnvMutexGuard<'_> {
    fn remember(&mut self, name: &OsStr) {
        if !self.redefined_vars.contains_key(name) {
            let prev_value = env::var_os(name);
            self.redefined_vars.insert(name.to_os_string(), prev_value);
        }
    }

    /// Sets env vars specified in `.env`-like format.
    pub fn set_env(&mut self, fixture: &str) {
        for line in fixture.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let (name, value) = line
                .split_once('=')
                .unwrap_or_else(|| panic!("Incorrect line for setting environment variable: {line}"));
            let name: &OsStr = name.as_ref();
            self.remember(name);
            env::set_var(name, value.trim_matches('"'));
        }
    }

    /// Removes the specified env vars.
    pub fn remove_env(&mut self, var_names: &[&str]) {
        for &var_name in var_names {
            let name: &OsStr = var_name.as_ref();
            self.remember(name);
            env::remove_var(name);
        }
    }
}

/// Parses the hash panicking upon deserialization failure.
pub fn hash(hash_str: &str) -> H256 {
    hash_str.parse().expect("Incorrect hash string")
}

#[test]
fn env_mutex_rolls_back_changes() {
    const TEST_VARIABLE_NAME: &str = "SETTLEMENT_TEST_VARIABLE_THAT_WILL_CERTAINLY_NOT_BE_SET";

    assert!(env::var_os(TEST_VARIABLE_NAME).is_none());
    let mutex = EnvMutex::new();
    {
        let mut lock = mutex.lock();
        lock.set_env(&format!("{TEST_VARIABLE_NAME}=\"test\""));
        assert_eq!(env::var(TEST_VARIABLE_NAME).unwrap(), "test");
        lock.remove_env(&[TEST_VARIABLE_NAME]);
        assert!(env::var_os(TEST_VARIABLE_NAME).is_none());
        lock.set_env(&format!("{TEST_VARIABLE_NAME}=again"));
    }
    assert!(env::var_os(TEST_VARIABLE_NAME).is_none());
}
