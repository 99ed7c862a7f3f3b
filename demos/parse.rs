use password_rules_inspector::{parse_rule, PasswordCharacter};

fn main() {
    let password_rule = "minlength: 8; required: digit; required: [- !\"#$&'()*+,.:;<=>?@[^_`{|}~]]; allowed: lower, upper;";
    let rule = parse_rule("admiral.com", password_rule);

    assert_eq!(rule.min_length(), Some(8));
    // This rule does not limit the password length
    assert!(rule.max_length().is_none());
    assert_eq!(
        rule.required().iter().cloned().collect::<Vec<_>>(),
        vec![
            PasswordCharacter::Digit,
            PasswordCharacter::other("- !\"#$&'()*+,.:;<=>?@[^_`{|}~]".chars()),
        ]
    );
    assert_eq!(
        rule.allowed().iter().cloned().collect::<Vec<_>>(),
        vec![PasswordCharacter::Upper, PasswordCharacter::Lower]
    );

    for class in rule.required() {
        println!("{}: required {}", rule.id(), class);
    }

    // The above information can be used to show a domain's password
    // requirements next to the ones of other domains
}
