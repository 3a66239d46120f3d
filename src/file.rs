use crate::error::Result;
use crate::key_gen::{PrivateKey, PublicKey};
use crate::rsa::EncryptedMessage;
use log::debug;
use std::fs;
use std::path::Path;

pub fn store_keys_in_files(
    pub_key: &PublicKey,
    priv_key: &PrivateKey,
    pub_path: &Path,
    priv_path: &Path,
) -> Result<()> {
    fs::write(pub_path, pub_key.to_bytes()?)?;
    fs::write(priv_path, priv_key.to_bytes()?)?;
    debug!(
        "Stored keys in {} and {}",
        pub_path.display(),
        priv_path.display()
    );
    Ok(())
}

pub fn read_public_key_from_file(path: &Path) -> Result<PublicKey> {
    PublicKey::from_bytes(&fs::read(path)?)
}

pub fn read_private_key_from_file(path: &Path) -> Result<PrivateKey> {
    PrivateKey::from_bytes(&fs::read(path)?)
}

pub fn store_encrypted_message(path: &Path, message: &EncryptedMessage) -> Result<()> {
    fs::write(path, message.to_string())?;
    Ok(())
}

pub fn read_encrypted_message(path: &Path) -> Result<EncryptedMessage> {
    fs::read_to_string(path)?.parse()
}

pub fn read_plaintext_message(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn store_plaintext_message(path: &Path, message: &str) -> Result<()> {
    fs::write(path, message)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::key_gen::Keypair;
    use crate::rsa::{rsa_decrypt, rsa_encrypt};
    use num_bigint::BigUint;

    #[test]
    fn keys_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let (pub_path, priv_path) = (dir.path().join("pub.json"), dir.path().join("priv.json"));
        let keypair =
            Keypair::from_primes(&BigUint::from(61u8), &BigUint::from(53u8), &BigUint::from(17u8))
                .unwrap();

        store_keys_in_files(
            &keypair.public_key(),
            &keypair.private_key(),
            &pub_path,
            &priv_path,
        )
        .unwrap();
        assert_eq!(read_public_key_from_file(&pub_path).unwrap(), keypair.public_key());
        assert_eq!(read_private_key_from_file(&priv_path).unwrap(), keypair.private_key());
    }

    #[test]
    fn messages_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let plain_path = dir.path().join("message.txt");
        let encrypted_path = dir.path().join("encrypted.txt");
        let keypair =
            Keypair::from_primes(&BigUint::from(61u8), &BigUint::from(53u8), &BigUint::from(17u8))
                .unwrap();

        store_plaintext_message(&plain_path, "Message test ! 12345.").unwrap();
        let message = read_plaintext_message(&plain_path).unwrap();
        let encrypted = rsa_encrypt(&keypair.public_key(), &message).unwrap();
        store_encrypted_message(&encrypted_path, &encrypted).unwrap();

        let loaded = read_encrypted_message(&encrypted_path).unwrap();
        assert_eq!(loaded, encrypted);
        assert_eq!(
            rsa_decrypt(&keypair.private_key(), &loaded).unwrap(),
            "Message test ! 12345."
        );
    }

    #[test]
    fn bad_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.txt");
        assert!(matches!(read_public_key_from_file(&path), Err(Error::Io(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(read_private_key_from_file(&path), Err(Error::Json(_))));
        assert!(matches!(read_encrypted_message(&path), Err(Error::Parse(_))));
    }
}
