use crate::app::{App, Screen};

pub fn execute(app: &App) -> Result<String, String> {
    let mut text = String::from("HelloGold spot price client\n");

    match app.screen() {
        Screen::SignUp => {
            let form = app.form();
            text.push_str(&format!(
                "Email: {:?} | Terms: {} | Done: {}\n",
                form.email(),
                if form.accepted_terms() { "on" } else { "off" },
                if form.submit_enabled() { "enabled" } else { "disabled" }
            ));
            text.push_str(
                "Sign up\n\
                 \x20 $email <address>   - Enter your email address\n\
                 \x20 $tnc on|off        - Accept or decline the terms and conditions\n\
                 \x20 $signup            - Submit the form (enabled once the email is valid)\n",
            );
        }
        Screen::PriceList(feed) => {
            text.push_str(&format!("Signed in as {}\n", feed.email()));
            text.push_str(
                "Price list\n\
                 \x20 $refresh           - Fetch the latest spot price\n\
                 \x20 $pull              - Pull to refresh\n\
                 \x20 $foreground        - Simulate the app returning to the foreground\n\
                 \x20 $list [page]       - Show the price history, newest first\n\
                 \x20 $signout           - Sign out and return to the sign-up form\n",
            );
        }
    }

    text.push_str("General\n\x20 $help              - Show this help message\n\x20 $quit              - Exit");
    Ok(text)
}
