use anyhow::{Result, anyhow};
use dialoguer::Password;

use crate::app::App;
use crate::cli::AdminCommands;

pub async fn handle(cmd: AdminCommands, app: &App) -> Result<()> {
    match cmd {
        AdminCommands::Login { email } => {
            let verifier = app
                .verifier
                .as_deref()
                .ok_or_else(|| anyhow!("Sign-in needs the remote backend"))?;
            let password = Password::new().with_prompt("Password").interact()?;

            app.session.login(verifier, &email, &password).await?;
            println!("✓ Signed in as {email}");
            Ok(())
        }
        AdminCommands::Logout => {
            app.session.logout()?;
            println!("Signed out.");
            Ok(())
        }
        AdminCommands::Status => {
            match app.session.email().filter(|_| app.session.is_authenticated()) {
                Some(email) => println!("Signed in as {email}"),
                None => println!("Not signed in."),
            }
            Ok(())
        }
    }
}
