use std::path::Path;

use figment::Jail;
use mood_config::MoodConfig;
use pretty_assertions::assert_eq;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("MOODTASK_API__BASE_URL", "http://10.0.0.5:8000/api/v1");
        jail.set_env("MOODTASK_CAMERA__READY_TIMEOUT_SECS", "9");

        let config = MoodConfig::load(None).expect("config loads");
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api/v1");
        assert_eq!(config.camera.ready_timeout_secs, 9);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[api]\ntimeout_secs = 12\n")?;
        jail.set_env("MOODTASK_API__TIMEOUT_SECS", "4");

        let config = MoodConfig::load(Some(Path::new("config.toml"))).expect("config loads");
        assert_eq!(config.api.timeout_secs, 4);
        Ok(())
    });
}

#[test]
fn dotenv_file_is_read() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "MOODTASK_API__USER_AGENT=moodtask-test\n")?;

        let config = MoodConfig::load_with_dotenv(None).expect("config loads");
        assert_eq!(config.api.user_agent, "moodtask-test");
        Ok(())
    });
}
