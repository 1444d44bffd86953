// src/models/validation.rs
// Validações compartilhadas pelos payloads. Os serviços gravam os textos com
// trim(), então as regras de tamanho olham o valor já sem espaços nas pontas.

use validator::ValidationError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 80;

/// Campo obrigatório: só espaços conta como vazio.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Este campo es requerido.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        let mut err = ValidationError::new("username");
        err.message = Some("El usuario debe tener entre 3 y 80 caracteres.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
        assert!(not_blank(" Sala A ").is_ok());
    }

    #[test]
    fn username_length_ignores_surrounding_spaces() {
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username(" ana ").is_ok());
        assert!(validate_username(&"x".repeat(81)).is_err());
    }
}
