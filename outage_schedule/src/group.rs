use shared_kernel::string_key;

const NOT_APPLICABLE_LABEL: &str = "Не входить";
const MAX_GROUP_DIGITS: usize = 4;

string_key!(GroupCode);
string_key!(GroupToken);

impl GroupCode {
    /// Empty or all-zero codes mark an address that is not part of the rotation.
    pub fn is_applicable(&self) -> bool {
        let code = self.as_str().trim();
        !code.is_empty() && !code.chars().all(|c| c == '0')
    }

    /// Renders the code as the schedule writes it: two digits become `d.d`,
    /// anything else is used as is.
    pub fn display_token(&self) -> GroupToken {
        let code = self.as_str().trim();
        let mut chars = code.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None)
                if first.is_ascii_digit() && second.is_ascii_digit() =>
            {
                GroupToken::new(format!("{first}.{second}"))
            }
            _ => GroupToken::from(code),
        }
    }

    pub fn display_label(&self) -> String {
        if self.is_applicable() {
            self.display_token().to_string()
        } else {
            NOT_APPLICABLE_LABEL.to_owned()
        }
    }

    /// Reads a group from free-form input such as `Група 4,1`, keeping digits only.
    pub fn normalize_input(raw: &str) -> Option<GroupCode> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if (1..=MAX_GROUP_DIGITS).contains(&digits.len()) {
            Some(GroupCode::from(digits))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GroupCode;
    use rstest::rstest;

    #[rstest]
    #[case("12", "1.2")]
    #[case("31", "3.1")]
    #[case("6", "6")]
    #[case("", "")]
    #[case("123", "123")]
    #[case("3.1", "3.1")]
    #[case(" 42 ", "4.2")]
    fn test_display_token(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(GroupCode::from(code).display_token(), expected);
    }

    #[rstest]
    #[case("", false)]
    #[case("0", false)]
    #[case("00", false)]
    #[case("10", true)]
    #[case("3", true)]
    fn test_is_applicable(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(GroupCode::from(code).is_applicable(), expected);
    }

    #[test]
    fn test_inapplicable_group_has_a_label() {
        assert_eq!(GroupCode::from("0").display_label(), "Не входить");
        assert_eq!(GroupCode::from("51").display_label(), "5.1");
    }

    #[rstest]
    #[case("Група 4,1", Some("41"))]
    #[case("2.2", Some("22"))]
    #[case("7", Some("7"))]
    #[case("група", None)]
    #[case("123456", None)]
    fn test_normalize_input(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            GroupCode::normalize_input(raw),
            expected.map(GroupCode::from)
        );
    }
}
