//! A signup page: name, email and password with confirmation.
//!
//! Run with `RUST_LOG=seedling=debug` to watch the page being driven.
//! Pass a directory to write the exported bundle there.

use seedling::app::{set_color, set_description};
use seedling::client::{show_if, SecretParams};
use seedling::forms::{EmailField, PasswordField, SubmitButton, TextField};
use seedling::testing::Pilot;
use seedling::widgets::{form, text};
use seedling::App;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut app = App::new("Signup");
    let doc = app.document_mut();
    let name = doc.new_string("");
    let email = doc.new_string("");
    let password = doc.new_secret(SecretParams::new("seedling-demo").with_cpu(4));
    let hashed = doc.new_string("");
    let welcome = doc.new_bool(false);

    app.add(set_description("Create an account"))?
        .add(set_color("#2b6cb0"))?
        .add(
            form()
                .with(
                    TextField::new("Name", &name)
                        .with_placeholder("Ada Lovelace")
                        .required(true),
                )
                .with(
                    EmailField::new("Email", &email)
                        .with_placeholder("ada@example.com")
                        .required(true),
                )
                .with(PasswordField::new(&password).required(true).confirm(true))
                .with(SubmitButton::new(
                    "Sign up",
                    [hashed.set(password.hash()), welcome.set(true)]
                        .into_iter()
                        .collect::<seedling::js::Script>(),
                )),
        )?
        .add(show_if(
            &welcome,
            [text::new().with(text::set_string("Welcome aboard!"))],
        ))?;

    let mut pilot = Pilot::for_app(&app)?;
    pilot.fill_in("Ada Lovelace", "Ada");
    pilot.fill_in("ada@example.com", "ada@example.com");
    for field in pilot.find_all_by_attribute("type", "password") {
        pilot.type_text(field, "analytical engine");
    }
    pilot.click_on("Sign up");
    println!("{}", pilot.html());
    println!("stored hash: {}", pilot.get(hashed.id()));

    let bundle = app.export()?;
    match std::env::args().nth(1) {
        Some(dir) => bundle.write_to(dir)?,
        None => println!("\n{}", bundle.html),
    }
    Ok(())
}
