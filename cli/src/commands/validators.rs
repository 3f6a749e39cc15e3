use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROPERTY_NAME_REGEX: Regex = Regex::new(r"^[^<>\s]+$").unwrap();
}

pub fn validate_property_name(name: &str) -> Result<String, String> {
    if !PROPERTY_NAME_REGEX.is_match(name) {
        return Err("Property name must not be empty or contain '<', '>' or whitespace".to_string());
    }
    Ok(name.to_string())
}

pub fn validate_property(property: &str) -> Result<String, String> {
    let Some((name, _)) = property.split_once('=') else {
        return Err("Property must be in format NAME=VALUE".to_string());
    };

    if let Err(e) = validate_property_name(name) {
        return Err(format!("Invalid property name: {e}"));
    }

    Ok(property.to_string())
}

pub fn validate_output_dir(dir: &str) -> Result<String, String> {
    if dir.trim().is_empty() {
        return Err("Output directory must not be empty".to_string());
    }
    Ok(dir.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_property_name() {
        assert!(validate_property_name("id").is_ok());
        assert!(validate_property_name("user-id").is_ok());
        assert!(validate_property_name("api.key").is_ok());

        assert!(validate_property_name("").is_err());
        assert!(validate_property_name("<id>").is_err());
        assert!(validate_property_name("user id").is_err());
    }

    #[test]
    fn test_validate_property() {
        assert!(validate_property("id=42").is_ok());
        assert!(validate_property("query=a=b").is_ok());
        assert!(validate_property("empty=").is_ok());

        assert!(validate_property("id").is_err());
        assert!(validate_property("=42").is_err());
    }

    #[test]
    fn test_validate_output_dir() {
        assert!(validate_output_dir("./out").is_ok());
        assert!(validate_output_dir("  ").is_err());
    }
}
