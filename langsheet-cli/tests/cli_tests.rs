use assert_cmd::Command;
use std::fs;
use std::path::Path;

fn write_config(dir: &Path, extra: &str) {
    let config = format!(
        r#"
app_name = "H5APP"
out_dir = "./lang"
sheet_path = "./data.csv"
{}
"#,
        extra
    );
    fs::write(dir.join("langsheet.toml"), config).unwrap();
}

fn write_sheet(dir: &Path, rows: &[(&str, &str, &str, &str, &str)]) {
    let mut csv = String::from(
        "id,issue,isHas,c3,c4,c5,WEBUC,WEBCO,H5WAP,H5APP,c10,zh,en,hk,kr,ru,es,pt,fa,jp,tr\n",
    );
    for (id, app, zh, en, tr) in rows {
        csv.push_str(&format!(
            "{},,,,,,,,,{},,\"{}\",\"{}\",,,,,,,,\"{}\"\n",
            id, app, zh, en, tr
        ));
    }
    fs::write(dir.join("data.csv"), csv).unwrap();
}

fn langsheet() -> Command {
    Command::cargo_bin("langsheet").unwrap()
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = langsheet()
        .current_dir(dir.path())
        .args(["generate"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration file"), "stderr: {}", stderr);
}

#[test]
fn incomplete_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("langsheet.toml"), "app_name = \"H5APP\"").unwrap();
    let output = langsheet()
        .current_dir(dir.path())
        .args(["generate"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("required settings"), "stderr: {}", stderr);
}

#[test]
fn generate_writes_claimed_entries_per_language() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "langs = [\"zh\", \"en\"]\nfile_type = \".js\"");
    write_sheet(
        dir.path(),
        &[
            ("1", "home/title", "欢迎", "Welcome", ""),
            ("2", "", "没人认领", "Unclaimed", ""),
        ],
    );

    langsheet()
        .current_dir(dir.path())
        .args(["generate"])
        .assert()
        .success();

    let zh = fs::read_to_string(dir.path().join("lang/zh/home.js")).unwrap();
    assert!(zh.starts_with("module.exports = {"));
    assert!(zh.contains("欢迎"));
    let en = fs::read_to_string(dir.path().join("lang/en/home.js")).unwrap();
    assert!(en.contains("Welcome"));
    // The unclaimed row contributes nothing.
    assert!(!en.contains("Unclaimed"));
}

#[test]
fn complete_fans_out_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
langs = ["zh", "en"]
complete_langs = ["en", "tr"]
complete_base_lang = "zh"
file_type = ".js"
find_missing_keys = true
find_missing_terms = true
untranslated_lang = "tr"
"#,
    );
    write_sheet(
        dir.path(),
        &[
            ("1", "", "欢迎", "Welcome", "欢迎"),
            ("2", "home/cta", "开始", "Start", "Başla"),
        ],
    );

    let base = dir.path().join("lang/zh");
    fs::create_dir_all(&base).unwrap();
    fs::write(
        base.join("home.js"),
        "module.exports = { title: '欢迎', cta: '开始' }",
    )
    .unwrap();

    langsheet()
        .current_dir(dir.path())
        .args(["complete"])
        .assert()
        .success();

    let en = fs::read_to_string(dir.path().join("lang/en/home.js")).unwrap();
    assert!(en.contains("Welcome"));
    assert!(en.contains("Start"));
    let tr = fs::read_to_string(dir.path().join("lang/tr/home.js")).unwrap();
    assert!(tr.contains("Başla"));

    // Row 1 is unclaimed → missing key; its Turkish cell still equals the
    // source text → missing term.
    let missing_keys: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("lang/missing_keys.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(missing_keys["1"]["home.title"], "欢迎");

    let missing_terms: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("lang/missing_terms.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(missing_terms["home.title"], "欢迎");
    assert!(missing_terms.get("home.cta").is_none());
}

#[test]
fn complete_without_base_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "complete_langs = [\"en\"]\nfile_type = \".js\"");
    write_sheet(dir.path(), &[("1", "", "欢迎", "Welcome", "")]);

    let output = langsheet()
        .current_dir(dir.path())
        .args(["complete"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("locale directory"), "stderr: {}", stderr);
}

#[test]
fn summary_groups_platform_files_into_csv() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
[summary]
base_dir = "./base"
output_file = "./merged.csv"
"#,
    );
    write_sheet(dir.path(), &[]);

    let android = dir.path().join("base/android/zh");
    fs::create_dir_all(&android).unwrap();
    fs::write(
        android.join("strings.xml"),
        r#"<resources><string name="ok_button">确定</string></resources>"#,
    )
    .unwrap();
    let android_en = dir.path().join("base/android/en");
    fs::create_dir_all(&android_en).unwrap();
    fs::write(
        android_en.join("strings.xml"),
        r#"<resources><string name="ok_button">OK</string></resources>"#,
    )
    .unwrap();

    let ios = dir.path().join("base/ios/zh");
    fs::create_dir_all(&ios).unwrap();
    fs::write(ios.join("Localizable.strings"), "\"confirm_btn\" = \"确定\";\n").unwrap();
    let ios_en = dir.path().join("base/ios/en");
    fs::create_dir_all(&ios_en).unwrap();
    fs::write(ios_en.join("Localizable.strings"), "\"confirm_btn\" = \"OK\";\n").unwrap();

    langsheet()
        .current_dir(dir.path())
        .args(["summary"])
        .assert()
        .success();

    let merged = fs::read_to_string(dir.path().join("merged.csv")).unwrap();
    let mut lines = merged.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("ANDROID-KEY"));
    assert!(header.contains("IOS-KEY"));
    // Same Chinese text, no strict-language divergence → one group row
    // carrying both platform keys.
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 1);
    assert!(body[0].contains("ok_button"));
    assert!(body[0].contains("confirm_btn"));
    assert!(body[0].contains("确定"));
    assert!(body[0].contains("OK"));
}
