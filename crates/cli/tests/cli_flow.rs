use assert_cmd::Command;
use predicates::prelude::*;

const MENU_JSON: &str = r#"[
    {"id": 1, "item_name": "Tea", "price": 10, "category": "Beverages",
     "description": "Hot tea", "availability": true},
    {"id": 2, "item_name": "Biscuits", "price": 10, "category": "Snacks",
     "description": "Crispy biscuits", "availability": true},
    {"id": 3, "item_name": "Samosa", "price": 20, "category": "Snacks",
     "description": "Vegetable samosa", "availability": false}
]"#;

fn write_menu(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("menu.json");
    std::fs::write(&path, MENU_JSON).unwrap();
    path
}

#[test]
fn recommend_outputs_ranked_json() {
    let dir = tempfile::tempdir().unwrap();
    let menu = write_menu(&dir);

    Command::cargo_bin("canteen")
        .unwrap()
        .args(["recommend", "--menu"])
        .arg(&menu)
        .args(["--cart", "Tea", "--limit", "3", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Biscuits"))
        .stdout(predicate::str::contains("recommendation_score"))
        // Samosa pairs with Tea but is unavailable.
        .stdout(predicate::str::contains("Samosa").not());
}

#[test]
fn recommend_honors_hybrid_strategy_flag() {
    let dir = tempfile::tempdir().unwrap();
    let menu = write_menu(&dir);

    Command::cargo_bin("canteen")
        .unwrap()
        .args(["--strategy", "hybrid", "recommend", "--menu"])
        .arg(&menu)
        .args(["--cart", "Tea", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Biscuits"));
}

#[test]
fn info_is_case_insensitive() {
    Command::cargo_bin("canteen")
        .unwrap()
        .args(["info", "tea", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Biscuits"))
        .stdout(predicate::str::contains("pairs_with"));
}

#[test]
fn info_unknown_item_fails_cleanly() {
    Command::cargo_bin("canteen")
        .unwrap()
        .args(["info", "Pizza", "--quiet"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No association data"));
}

#[test]
fn recommend_rejects_missing_menu_file() {
    Command::cargo_bin("canteen")
        .unwrap()
        .args([
            "recommend",
            "--menu",
            "/nonexistent/menu.json",
            "--cart",
            "Tea",
            "--quiet",
        ])
        .assert()
        .failure();
}

#[test]
fn broken_knowledge_file_degrades_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let menu = write_menu(&dir);
    let knowledge = dir.path().join("broken.json");
    std::fs::write(&knowledge, "{not json").unwrap();

    // Fail-soft: the engine starts with an empty knowledge base and the
    // command still succeeds.
    Command::cargo_bin("canteen")
        .unwrap()
        .args(["--knowledge"])
        .arg(&knowledge)
        .args(["recommend", "--menu"])
        .arg(&menu)
        .args(["--cart", "Tea", "--quiet"])
        .assert()
        .success();
}
