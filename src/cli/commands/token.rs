use serde_json::json;

use crate::auth::{Claims, JwtKeys, Role};
use crate::cli::OutputFormat;
use crate::config::config;

/// Roles granted by `token`; admins are always users too
pub fn roles_for(admin: bool) -> Vec<Role> {
    if admin {
        vec![Role::User, Role::Admin]
    } else {
        vec![Role::User]
    }
}

pub fn handle(
    email: &str,
    admin: bool,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let security = &config().security;
    let keys = JwtKeys::from_secret(&security.jwt_secret)?;

    let claims = Claims::new(
        email,
        roles_for(admin),
        hours.unwrap_or(security.jwt_expiry_hours),
    )?;
    let token = keys.generate(&claims)?;

    match output_format {
        OutputFormat::Json => {
            let body = json!({
                "token": token,
                "sub": claims.sub,
                "roles": claims.roles,
                "exp": claims.exp,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
