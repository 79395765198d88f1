use super::*;
use crate::config::test_helpers::{isolated_env, set};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gistauth").chain(args.iter().copied())).unwrap()
}

#[test]
fn flags_alone_build_config() {
    let _env = isolated_env();

    let cli = parse(&["--be-url", " http://be.test/ ", "--proxy-url", " http://localhost:3000/ ", "check"]);
    let cfg = cli.auth_config().unwrap();

    assert_eq!(cfg.backend_url, "http://be.test");
    assert_eq!(cfg.route, SessionRoute::Proxy("http://localhost:3000".into()));
    assert_eq!(cfg.landing_path, DEFAULT_LANDING_PATH);
    assert_eq!(cfg.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cli.command, Command::Client(ClientCommand::Check));
}

#[test]
fn env_fills_missing_flags() {
    let env = isolated_env();
    set(&env, "BE_URL", "http://env-be/");
    set(&env, "SESSION_COOKIE", "abc123");
    set(&env, "LANDING_PATH", "/home");
    set(&env, "GISTAUTH_STATE_DIR", "/tmp/gistauth");
    set(&env, "PORT", "4100");

    let cfg = parse(&["serve"]).auth_config().unwrap();

    assert_eq!(cfg.backend_url, "http://env-be");
    assert_eq!(cfg.route, SessionRoute::Direct);
    assert_eq!(cfg.session_cookie.as_deref(), Some("abc123"));
    assert_eq!(cfg.landing_path, "/home");
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/gistauth"));
    assert_eq!(cfg.port, 4100);
}

#[test]
fn flag_overrides_env() {
    let env = isolated_env();
    set(&env, "BE_URL", "http://env-be");
    set(&env, "PROXY_URL", "http://env-proxy");
    set(&env, "PORT", "4100");

    let cli = parse(&["--be-url", "http://flag-be", "--proxy-url", "http://flag-proxy", "--port", "5200", "whoami"]);
    let cfg = cli.auth_config().unwrap();

    assert_eq!(cfg.backend_url, "http://flag-be");
    assert_eq!(cfg.route, SessionRoute::Proxy("http://flag-proxy".into()));
    assert_eq!(cfg.port, 5200);
    assert_eq!(cli.command, Command::Whoami);
}

#[test]
fn missing_backend_url_is_config_error() {
    let _env = isolated_env();

    let err = parse(&["check"]).auth_config().unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "BE_URL" }));
}

#[test]
fn blank_proxy_flag_means_direct() {
    let _env = isolated_env();

    let cfg = parse(&["--be-url", "http://be", "--proxy-url", "  ", "login"]).auth_config().unwrap();
    assert_eq!(cfg.route, SessionRoute::Direct);
}

#[test]
fn bad_port_is_rejected_by_parser() {
    let _env = isolated_env();

    let err = Cli::try_parse_from(["gistauth", "--be-url", "http://be", "--port", "eighty", "serve"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn client_subcommands_parse() {
    let _env = isolated_env();

    assert_eq!(parse(&["login"]).command, Command::Client(ClientCommand::Login));
    assert_eq!(parse(&["logout"]).command, Command::Client(ClientCommand::Logout));
    assert_eq!(parse(&["serve"]).command, Command::Serve);
}
