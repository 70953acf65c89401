use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("schema"));
}

#[test]
fn schema_prints_books_table() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("schema")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-- books/001_books"));
    assert!(stdout.contains("CREATE TABLE IF NOT EXISTS books"));
}

#[test]
fn unknown_backend_is_rejected() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .args(["serve", "--backend", "sqlite"])
        .assert()
        .failure();
}
