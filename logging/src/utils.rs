use std::ffi::OsString;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GetFromEnvError {
    #[error("Env var {var_name}'s contents are not valid unicode: {data:?}")]
    NotUnicode { var_name: String, data: OsString },
}

/// Reads an env var; an absent variable is `Ok(None)`, not an error
pub fn get_from_env(var_name: &str) -> Result<Option<String>, GetFromEnvError> {
    std::env::var(var_name).map(Some).or_else(|e| match e {
        std::env::VarError::NotPresent => Ok(None),
        std::env::VarError::NotUnicode(data) => Err(GetFromEnvError::NotUnicode {
            var_name: var_name.to_owned(),
            data,
        }),
    })
}
