//! Account Page Views
//!
//! Server-rendered HTML for the account pages. All dynamic text goes
//! through `html_escape`.

use kernel::error::render::html_escape;

use crate::domain::entity::session::{Flash, UserSnapshot};
use crate::domain::entity::user::User;

/// Shared page shell with navigation and the flash banner.
pub fn layout(
    title: &str,
    user: Option<&UserSnapshot>,
    flash: Option<&Flash>,
    body: &str,
) -> String {
    let nav = match user {
        Some(u) => format!(
            "<a href=\"/\">Home</a> <a href=\"/users\">Users</a> \
             <a href=\"/contact\">Contact</a> <a href=\"/dashboard\">Dashboard</a> \
             <a href=\"/logout\">Log out ({name})</a>",
            name = html_escape(&u.name)
        ),
        None => "<a href=\"/\">Home</a> <a href=\"/users\">Users</a> \
                 <a href=\"/contact\">Contact</a> <a href=\"/login\">Log in</a> \
                 <a href=\"/register\">Register</a>"
            .to_string(),
    };

    let flash_banner = match flash {
        Some(f) => format!(
            "<p class=\"flash flash-{kind}\">{text}</p>",
            kind = f.kind.code(),
            text = html_escape(&f.text)
        ),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<nav>{nav}</nav>\n{flash_banner}\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = html_escape(title),
        nav = nav,
        flash_banner = flash_banner,
        body = body,
    )
}

pub fn login_page(user: Option<&UserSnapshot>, flash: Option<&Flash>) -> String {
    let body = "<h1>Log in</h1>\n\
        <form method=\"post\" action=\"/login\">\n\
        <label>Email <input type=\"email\" name=\"email\"></label>\n\
        <label>Password <input type=\"password\" name=\"password\"></label>\n\
        <button type=\"submit\">Log in</button>\n\
        </form>\n\
        <p>No account yet? <a href=\"/register\">Register</a></p>";
    layout("Log in", user, flash, body)
}

pub fn registration_page(user: Option<&UserSnapshot>, flash: Option<&Flash>) -> String {
    let body = "<h1>User Registration</h1>\n\
        <form method=\"post\" action=\"/register\">\n\
        <label>Name <input type=\"text\" name=\"name\"></label>\n\
        <label>Email <input type=\"email\" name=\"email\"></label>\n\
        <label>Confirm email <input type=\"email\" name=\"confirm_email\"></label>\n\
        <label>Password <input type=\"password\" name=\"password\"></label>\n\
        <label>Confirm password <input type=\"password\" name=\"confirm_password\"></label>\n\
        <button type=\"submit\">Register</button>\n\
        </form>";
    layout("User Registration", user, flash, body)
}

pub fn users_page(
    users: &[User],
    current: Option<&UserSnapshot>,
    flash: Option<&Flash>,
) -> String {
    let mut rows = String::new();
    for user in users {
        let mut actions = String::new();
        if let Some(me) = current {
            if me.may_edit(user.id) {
                actions.push_str(&format!(
                    "<a href=\"/users/{id}/edit\">Edit</a> ",
                    id = user.id
                ));
            }
            if me.may_delete(user.id) {
                actions.push_str(&format!(
                    "<form method=\"post\" action=\"/users/{id}/delete\">\
                     <button type=\"submit\">Delete</button></form>",
                    id = user.id
                ));
            }
        }

        rows.push_str(&format!(
            "<tr><td>{name}</td><td>{email}</td><td>{role}</td><td>{joined}</td><td>{actions}</td></tr>\n",
            name = html_escape(user.name.as_str()),
            email = html_escape(user.email.as_str()),
            role = user.role.code(),
            joined = user.created_at.format("%Y-%m-%d"),
            actions = actions,
        ));
    }

    let body = format!(
        "<h1>Registered Users</h1>\n<table>\n\
         <tr><th>Name</th><th>Email</th><th>Role</th><th>Joined</th><th></th></tr>\n\
         {rows}</table>",
        rows = rows
    );
    layout("Registered Users", current, flash, &body)
}

pub fn edit_page(user: &User, current: &UserSnapshot, flash: Option<&Flash>) -> String {
    let body = format!(
        "<h1>Edit Account</h1>\n\
         <form method=\"post\" action=\"/users/{id}/update\">\n\
         <label>Name <input type=\"text\" name=\"name\" value=\"{name}\"></label>\n\
         <label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n\
         <button type=\"submit\">Save changes</button>\n\
         </form>\n\
         <p><a href=\"/users\">Back to users</a></p>",
        id = user.id,
        name = html_escape(user.name.as_str()),
        email = html_escape(user.email.as_str()),
    );
    layout("Edit Account", Some(current), flash, &body)
}

pub fn dashboard_page(user: &UserSnapshot, flash: Option<&Flash>) -> String {
    let body = format!(
        "<h1>Dashboard</h1>\n\
         <p>Welcome back, {name}.</p>\n\
         <ul>\n<li>Email: {email}</li>\n<li>Role: {role}</li>\n</ul>",
        name = html_escape(&user.name),
        email = html_escape(user.email.as_str()),
        role = user.role.code(),
    );
    layout("Dashboard", Some(user), flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::session::FlashKind;
    use crate::domain::value_object::email::Email;
    use crate::domain::value_object::user_role::UserRole;
    use kernel::id::Id;

    fn snapshot(role: UserRole) -> UserSnapshot {
        UserSnapshot {
            id: Id::from_i64(1),
            name: "Alice <script>".to_string(),
            email: Email::from_db("alice@example.com"),
            role,
        }
    }

    #[test]
    fn test_layout_escapes_user_name() {
        let me = snapshot(UserRole::User);
        let page = layout("Title", Some(&me), None, "<p>body</p>");
        assert!(!page.contains("Alice <script>"));
        assert!(page.contains("Alice &lt;script&gt;"));
    }

    #[test]
    fn test_flash_banner_rendered_with_kind_class() {
        let flash = Flash {
            kind: FlashKind::Error,
            text: "Invalid email or password.".to_string(),
        };
        let page = login_page(None, Some(&flash));
        assert!(page.contains("flash-error"));
        assert!(page.contains("Invalid email or password."));
    }

    #[test]
    fn test_dashboard_shows_snapshot_fields() {
        let me = snapshot(UserRole::Admin);
        let page = dashboard_page(&me, None);
        assert!(page.contains("alice@example.com"));
        assert!(page.contains("Role: admin"));
    }
}
