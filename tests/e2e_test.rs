mod common;
mod utils;

use anyhow::Result;
use common::TestEnvironment;

#[test]
fn test_sync_single_file() -> Result<()> {
    let env = TestEnvironment::new()?;
    let zshrc = env.sources().join(".zshrc");
    utils::write_file(&zshrc, "hello")?;
    env.write_config(None, &[(&zshrc, "file", "zsh")])?;

    let output = utils::run_dotsync(&env, &["sync"])?;
    assert_eq!(output.exit_code, 0, "sync failed: {}", output.stderr);

    assert_eq!(utils::read_file(&env.dotfiles().join("zsh"))?, "hello");
    Ok(())
}

#[test]
fn test_sync_directory_nests_under_config() -> Result<()> {
    let env = TestEnvironment::new()?;
    let nvim = env.sources().join("nvim");
    utils::write_file(&nvim.join("init.lua"), "require('a')")?;
    utils::write_file(&nvim.join("lua").join("a.lua"), "return {}")?;
    env.write_config(None, &[(&nvim, "directory", "nvim")])?;

    let output = utils::run_dotsync(&env, &["sync"])?;
    assert_eq!(output.exit_code, 0, "sync failed: {}", output.stderr);

    let dest = env.dotfiles().join("nvim").join("config");
    assert_eq!(utils::read_file(&dest.join("init.lua"))?, "require('a')");
    assert_eq!(utils::read_file(&dest.join("lua").join("a.lua"))?, "return {}");
    Ok(())
}

#[test]
fn test_sync_reports_missing_source_and_continues() -> Result<()> {
    let env = TestEnvironment::new()?;
    let first = env.sources().join("gitconfig");
    let missing = env.sources().join("does-not-exist");
    let third = env.sources().join("tmux.conf");
    utils::write_file(&first, "[user]")?;
    utils::write_file(&third, "set -g mouse on")?;
    env.write_config(
        None,
        &[
            (&first, "file", "git"),
            (&missing, "file", "ghost"),
            (&third, "file", "tmux"),
        ],
    )?;

    let output = utils::run_dotsync(&env, &["sync"])?;

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("source not found"), "{}", output.stderr);
    assert!(env.dotfiles().join("git").exists());
    assert!(!env.dotfiles().join("ghost").exists());
    assert_eq!(utils::read_file(&env.dotfiles().join("tmux"))?, "set -g mouse on");
    Ok(())
}

#[test]
fn test_missing_config_is_fatal() -> Result<()> {
    let env = TestEnvironment::new()?;

    let output = utils::run_dotsync(&env, &["sync"])?;

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("config file not found"), "{}", output.stderr);
    Ok(())
}

#[test]
fn test_json_output_is_one_object_per_line() -> Result<()> {
    let env = TestEnvironment::new()?;
    let zshrc = env.sources().join(".zshrc");
    utils::write_file(&zshrc, "hello")?;
    env.write_config(None, &[(&zshrc, "file", "zsh")])?;

    let output = utils::run_dotsync(&env, &["--json", "sync"])?;
    assert_eq!(output.exit_code, 0, "sync failed: {}", output.stderr);

    let codes: Vec<String> = output
        .stdout
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).expect("valid json line");
            value["code"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert!(codes.contains(&"sync.item.ok".to_string()), "{codes:?}");
    assert!(codes.contains(&"sync.summary".to_string()), "{codes:?}");
    Ok(())
}

#[test]
fn test_status_before_first_push_fails() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_config(None, &[])?;

    let output = utils::run_dotsync(&env, &["status"])?;

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("not a git repository"), "{}", output.stderr);
    Ok(())
}

#[test]
fn test_push_publishes_to_remote() -> Result<()> {
    if !utils::git_available() {
        return Ok(());
    }
    let env = TestEnvironment::new()?;
    let remote = env.path().join("remote.git");
    std::fs::create_dir_all(&remote)?;
    utils::git(&remote, &["init", "--bare"])?;

    let zshrc = env.sources().join(".zshrc");
    utils::write_file(&zshrc, "hello")?;
    env.write_config(Some(&remote.display().to_string()), &[(&zshrc, "file", "zsh")])?;

    let output = utils::run_dotsync(&env, &["sync"])?;
    assert_eq!(output.exit_code, 0, "sync failed: {}", output.stderr);

    // First push initializes the repository; the initial commit takes everything.
    let output = utils::run_dotsync(&env, &["push"])?;
    assert_eq!(output.exit_code, 0, "push failed: {}", output.stderr);
    assert!(output.stdout.contains("nothing to commit"), "{}", output.stdout);
    assert_eq!(
        utils::git(&env.dotfiles(), &["remote", "get-url", "origin"])?,
        remote.display().to_string()
    );

    utils::write_file(&zshrc, "hello again")?;
    let output = utils::run_dotsync(&env, &["sync"])?;
    assert_eq!(output.exit_code, 0, "sync failed: {}", output.stderr);

    let output = utils::run_dotsync(&env, &["status"])?;
    assert_eq!(output.exit_code, 0, "status failed: {}", output.stderr);
    assert!(output.stdout.contains("1 change"), "{}", output.stdout);

    let output = utils::run_dotsync(&env, &["push", "-m", "update zsh"])?;
    assert_eq!(output.exit_code, 0, "push failed: {}", output.stderr);
    assert!(output.stdout.contains("Pushed to"), "{}", output.stdout);

    let log = utils::git(&remote, &["log", "--all", "--format=%s"])?;
    assert!(log.contains("update zsh"), "{log}");
    Ok(())
}

#[test]
fn test_push_without_remote_fails() -> Result<()> {
    if !utils::git_available() {
        return Ok(());
    }
    let env = TestEnvironment::new()?;
    let zshrc = env.sources().join(".zshrc");
    utils::write_file(&zshrc, "hello")?;
    env.write_config(None, &[(&zshrc, "file", "zsh")])?;

    utils::run_dotsync(&env, &["sync"])?;
    utils::run_dotsync(&env, &["push"])?;
    utils::write_file(&zshrc, "changed")?;
    utils::run_dotsync(&env, &["sync"])?;

    let output = utils::run_dotsync(&env, &["push"])?;

    assert_eq!(output.exit_code, 1);
    assert!(output.stderr.contains("failed to git push"), "{}", output.stderr);
    Ok(())
}

#[test]
fn test_debug_records_git_commands() -> Result<()> {
    if !utils::git_available() {
        return Ok(());
    }
    let env = TestEnvironment::new()?;
    env.write_config(None, &[])?;

    let output = utils::run_dotsync(&env, &["--debug", "push"])?;
    assert_eq!(output.exit_code, 0, "push failed: {}", output.stderr);

    let output = utils::run_dotsync(&env, &["log", "-n", "50"])?;
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("git init"), "{}", output.stdout);
    Ok(())
}
