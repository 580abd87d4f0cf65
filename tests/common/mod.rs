use insta_cmd::get_cargo_bin;
use std::process::Command;

macro_rules! apply_filters {
    {} => {
        let mut settings = insta::Settings::clone_current();
        settings.add_filter(r#"name = "\.tmp\w+""#, r#"name = "[TMP_DIR]""#);
        let _bound = settings.bind_to_scope();
    }
}

#[allow(unused_imports)]
pub(crate) use apply_filters;

pub const FIXTURES_PATH: &str = "tests/fixtures/conda";

pub fn cli() -> Command {
    Command::new(get_cargo_bin("conda2pixi"))
}
