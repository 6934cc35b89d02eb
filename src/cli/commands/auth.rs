use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::auth::{AuthLogic, Registration};
use crate::core::session::Session;
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let mut pool = DbPool::new(&cfg.database)?;
            let user = AuthLogic::register(
                &mut pool,
                &Registration {
                    full_name: name,
                    email,
                    password,
                    confirm,
                },
            )?;
            success(format!("Account created for {} <{}>", user.full_name, user.email));
            info("You can now sign in with `rollcall login`.");
        }

        Commands::Login { email, password } => {
            let mut pool = DbPool::new(&cfg.database)?;
            let user = AuthLogic::login(&mut pool, email, password)?;
            let session = Session::for_user(&user, cfg.session_hours)?;
            session.save(&cfg.session_file())?;
            success(format!(
                "Signed in as {} <{}> until {}",
                session.full_name,
                session.email,
                session.expires_at.format("%Y-%m-%d %H:%M")
            ));
        }

        Commands::Logout => {
            let session = Session::load(&cfg.session_file())?;
            if Session::clear(&cfg.session_file())? {
                if let Some(s) = session {
                    let pool = DbPool::new(&cfg.database)?;
                    audit_quiet(&pool.conn, "logout", &s.email, "Signed out");
                }
                success("Signed out.");
            } else {
                info("Not signed in.");
            }
        }

        Commands::Whoami => match Session::load(&cfg.session_file())? {
            Some(s) => {
                println!("{} <{}>", s.full_name, s.email);
                println!(
                    "signed in {}, expires {}",
                    s.signed_in_at.format("%Y-%m-%d %H:%M"),
                    s.expires_at.format("%Y-%m-%d %H:%M")
                );
            }
            None => info("Not signed in."),
        },

        _ => {}
    }

    Ok(())
}
