use super::*;
use std::sync::Mutex;

// Env vars are process-global; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const KEYS: [&str; 5] = [
    "CLASSROOM_API_ROOT",
    "CLASSROOM_PAGE_LIMIT",
    "CLASSROOM_SEARCH_DEBOUNCE_MS",
    "CLASSROOM_NOTIFICATION_POLL_SECS",
    "CLASSROOM_FLASH_SECS",
];

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_env() {
    for key in KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_base(), "http://localhost:5000/api");
    assert_eq!(cfg.search_debounce, Duration::from_millis(400));
    assert_eq!(cfg.notification_poll, Duration::from_secs(30));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("CLASSROOM_API_ROOT", "https://school.example.test/");
        std::env::set_var("CLASSROOM_PAGE_LIMIT", "25");
        std::env::set_var("CLASSROOM_SEARCH_DEBOUNCE_MS", "300");
        std::env::set_var("CLASSROOM_NOTIFICATION_POLL_SECS", "5");
        std::env::set_var("CLASSROOM_FLASH_SECS", "1");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_root, "https://school.example.test");
    assert_eq!(cfg.api_base(), "https://school.example.test/api");
    assert_eq!(cfg.page_limit, 25);
    assert_eq!(cfg.search_debounce, Duration::from_millis(300));
    assert_eq!(cfg.notification_poll, Duration::from_secs(5));
    assert_eq!(cfg.flash_ttl, Duration::from_secs(1));

    unsafe { clear_env() };
}

#[test]
fn from_env_ignores_unparseable_numbers() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("CLASSROOM_PAGE_LIMIT", "lots");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.page_limit, DEFAULT_PAGE_LIMIT);

    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_zero_limit() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_env();
        std::env::set_var("CLASSROOM_PAGE_LIMIT", "0");
    }

    let err = ClientConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::ZeroPageLimit));

    unsafe { clear_env() };
}

#[test]
fn with_root_strips_api_suffix() {
    let cfg = ClientConfig::with_root("http://127.0.0.1:5000/api/").unwrap();
    assert_eq!(cfg.api_root, "http://127.0.0.1:5000");
    assert_eq!(cfg.api_base(), "http://127.0.0.1:5000/api");
}

#[test]
fn with_root_rejects_non_http() {
    let err = ClientConfig::with_root("ftp://files").unwrap_err().to_string();
    assert!(err.contains("invalid CLASSROOM_API_ROOT"));
}
