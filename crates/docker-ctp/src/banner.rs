use colored::Colorize;

const BANNER: &str = r#"
     _            _                   _
  __| | ___   ___| | _____ _ __   ___| |_ _ __
 / _` |/ _ \ / __| |/ / _ \ '__| / __| __| '_ \
| (_| | (_) | (__|   <  __/ |   | (__| |_| |_) |
 \__,_|\___/ \___|_|\_\___|_|    \___|\__| .__/
                                         |_|
"#;

pub fn render(dry_run: bool) -> String {
    let mut out = format!(
        "{}\n  {} v{}\n",
        BANNER.cyan().bold(),
        "build · tag · push".bold(),
        env!("CARGO_PKG_VERSION")
    );
    if dry_run {
        out.push_str(&format!(
            "\n  {}\n",
            "DRY RUN MODE - No commands executed".yellow().bold()
        ));
    }
    out
}

pub fn print(dry_run: bool) {
    println!("{}", render(dry_run));
}
