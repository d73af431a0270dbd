use planokit_settings::{Config, SettingsError};

#[test]
fn test_round_trip_toml_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.editor.grid_size = 25.0;
    config.editor.snap_enabled = false;
    config.planogram.default_quantity = 2;
    config.storage.data_dir = dir.path().join("data");

    for name in ["nested/config.toml", "config.json"] {
        let path = dir.path().join(name);
        config.save_to_file(&path).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[planogram]\nmax_quantity = 0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));

    std::fs::write(&path, "editor = 3").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());

    let settings = config.designer_settings();
    assert_eq!(settings.canvas.grid_size, 20.0);
    assert_eq!(settings.max_quantity, 20);
}
