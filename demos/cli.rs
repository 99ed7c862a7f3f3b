use dialoguer::Input;
use password_rules_inspector::parse_rule_with_diagnostics;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    // Set RUST_LOG=debug to see every skipped clause as it happens
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Example rules that you can input:
    //
    // minlength: 8; max-consecutive: 2; required: lower, upper; required: digit; allowed: [-_./\\@$*&!#];
    let domain = Input::<String>::new()
        .with_prompt("Domain")
        .default("example.com".into())
        .interact()?;
    let password_rule = Input::<String>::new()
        .with_prompt("Enter password rule string")
        .interact()?;

    let (rule, diagnostics) = parse_rule_with_diagnostics(&domain, &password_rule);
    println!("Parsed rule: {:#?}", rule);
    println!("Length: {}", rule.length_label());

    if !diagnostics.is_empty() {
        println!("{}", diagnostics.to_string_pretty(&password_rule)?);
    }

    Ok(())
}
