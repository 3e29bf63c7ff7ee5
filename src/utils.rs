pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=14400;{secure_attr} Path=/; SameSite=Strict")
}

pub fn clear_cookie(name: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}=; HttpOnly; Max-Age=0;{secure_attr} Path=/; SameSite=Strict")
}
