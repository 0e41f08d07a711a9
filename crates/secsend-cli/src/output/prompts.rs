//! User prompts and input

use dialoguer::Password;

/// Prompt for a share-link key typed in by hand, e.g. when a link was
/// copied without its `#key` fragment. Loops until a valid base-36 key
/// is entered, mirroring `cli/secsend/cli.py::ask_password`.
pub fn ask_key() -> std::io::Result<secsend_crypto::Key> {
    loop {
        let input: String = Password::new().with_prompt("Enter key").interact()?;
        if let Some(key) = secsend_crypto::Key::from_base36(input.trim()) {
            return Ok(key);
        }
        eprintln!("Invalid key, try again.");
    }
}
