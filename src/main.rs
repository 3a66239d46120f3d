use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use requestty::{ErrorKind, Question};
use small_rsa::config::Settings;
use small_rsa::crack::crack_public_key;
use small_rsa::file::*;
use small_rsa::key_gen::generate_verified_keypair;
use small_rsa::rsa::{rsa_decrypt_with, rsa_encrypt_with};
use small_rsa::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

const CHECK_MESSAGE: &str = "Message test ! 12345.";

const ACTIONS: [&str; 6] = [
    "Generate keys",
    "Encrypt a message",
    "Decrypt a message",
    "Crack the private key",
    "Run everything",
    "Quit",
];

fn ask_path(name: &str, message: &str, default: &Path) -> Result<PathBuf> {
    let answer = requestty::prompt_one(
        Question::input(name)
            .message(message)
            .default(default.display().to_string())
            .build(),
    )?;
    Ok(answer
        .as_string()
        .map(PathBuf::from)
        .unwrap_or_else(|| default.to_path_buf()))
}

fn generate_keys(settings: &Settings, rng: &mut StdRng) -> Result<()> {
    let keypair = generate_verified_keypair(&settings.key_gen, &settings.codec, CHECK_MESSAGE, rng)?;
    store_keys_in_files(
        &keypair.public_key(),
        &keypair.private_key(),
        &settings.files.public_key,
        &settings.files.private_key,
    )?;
    println!("Public key  (n, e): ({}, {})", keypair.n(), keypair.e());
    println!("Private key (n, d): ({}, {})", keypair.n(), keypair.d());
    Ok(())
}

fn encrypt_message(settings: &Settings, input: &Path) -> Result<()> {
    let pub_key = read_public_key_from_file(&settings.files.public_key)?;
    let message = read_plaintext_message(input)?;
    let now = Instant::now();
    let encrypted = rsa_encrypt_with(&settings.codec, &pub_key, &message)?;
    info!("Encrypted in {}ms", now.elapsed().as_millis());
    store_encrypted_message(&settings.files.encrypted, &encrypted)?;
    println!("{}", encrypted);
    Ok(())
}

fn decrypt_message(settings: &Settings) -> Result<()> {
    let priv_key = read_private_key_from_file(&settings.files.private_key)?;
    let encrypted = read_encrypted_message(&settings.files.encrypted)?;
    let now = Instant::now();
    let message = rsa_decrypt_with(&settings.codec, &priv_key, &encrypted)?;
    info!("Decrypted in {}ms", now.elapsed().as_millis());
    store_plaintext_message(&settings.files.decrypted, &message)?;
    println!("{}", message);
    Ok(())
}

fn crack_message(settings: &Settings, rng: &mut StdRng) -> Result<()> {
    let pub_key = read_public_key_from_file(&settings.files.public_key)?;
    let encrypted = read_encrypted_message(&settings.files.encrypted)?;
    let priv_key = crack_public_key(&pub_key, settings.crack.rounds, rng)?;
    println!("Private key found (n, d): ({}, {})", priv_key.n(), priv_key.d());
    let message = rsa_decrypt_with(&settings.codec, &priv_key, &encrypted)?;
    store_plaintext_message(&settings.files.cracked, &message)?;
    println!("{}", message);
    Ok(())
}

fn run_action(index: usize, settings: &Settings, rng: &mut StdRng) -> Result<()> {
    match index {
        0 => generate_keys(settings, rng),
        1 => {
            let input = ask_path("input", "Message file", &settings.files.plaintext)?;
            encrypt_message(settings, &input)
        }
        2 => decrypt_message(settings),
        3 => crack_message(settings, rng),
        4 => {
            let input = ask_path("input", "Message file", &settings.files.plaintext)?;
            generate_keys(settings, rng)?;
            encrypt_message(settings, &input)?;
            decrypt_message(settings)?;
            crack_message(settings, rng)
        }
        _ => Ok(()),
    }
}

fn run() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    let mut rng = StdRng::from_entropy();

    loop {
        let answer = requestty::prompt_one(
            Question::select("action")
                .message("What do you want to do?")
                .choices(ACTIONS.iter().map(|action| action.to_string()))
                .build(),
        );
        let index = match answer {
            Ok(answer) => answer.as_list_item().map_or(ACTIONS.len() - 1, |item| item.index),
            Err(ErrorKind::Interrupted) => break,
            Err(err) => return Err(err.into()),
        };
        if index == ACTIONS.len() - 1 {
            break;
        }

        let now = Instant::now();
        match run_action(index, &settings, &mut rng) {
            Ok(()) => info!(
                "{} completed in {}ms",
                ACTIONS[index],
                now.elapsed().as_millis()
            ),
            Err(err) => error!("{} failed: {}", ACTIONS[index], err),
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}
