use libtest_mimic::{Arguments, Failed, Trial};
use paseto_local::{EncryptedToken, LocalKey};
use serde::Deserialize;

fn main() {
    let args = Arguments::from_args();

    let file = std::fs::read_to_string("tests/vectors/v4_local.json").unwrap();
    let test_file: TestFile = serde_json::from_str(&file).unwrap();

    let trials = test_file
        .tests
        .into_iter()
        .map(|test| {
            let name = format!("v4.local::{}", test.name);
            Trial::test(name, move || test.run())
        })
        .collect();

    libtest_mimic::run(&args, trials).exit();
}

#[derive(Deserialize)]
struct TestFile {
    tests: Vec<VectorTest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct VectorTest {
    name: String,
    expect_fail: bool,
    key: String,
    nonce: String,
    token: String,
    payload: Option<String>,
    footer: String,
    implicit_assertion: String,
}

impl VectorTest {
    fn run(self) -> Result<(), Failed> {
        let key = hex::decode(self.key).unwrap();
        let key = LocalKey::from_bytes(&key).unwrap();

        if self.expect_fail {
            let Ok(token) = self.token.parse::<EncryptedToken>() else {
                return Ok(());
            };
            if token.unverified_footer() != self.footer.as_bytes() {
                return Err("unexpected footer".into());
            }

            match key.unseal(token, self.implicit_assertion.as_bytes()) {
                Ok(_) => Err("decrypting token should fail".into()),
                Err(_) => Ok(()),
            }
        } else {
            let payload = self.payload.expect("success vectors carry a payload");

            let plaintext = key.decrypt(
                &self.token,
                self.implicit_assertion.as_bytes(),
                Some(self.footer.as_bytes()),
            )?;
            if plaintext != payload.as_bytes() {
                return Err("decrypted payload mismatch".into());
            }

            let nonce: [u8; 32] = hex::decode(self.nonce).unwrap().try_into().unwrap();
            let token = key.dangerous_encrypt_with_nonce(
                payload.as_bytes(),
                self.footer.as_bytes(),
                self.implicit_assertion.as_bytes(),
                nonce,
            );
            if token.to_string() != self.token {
                return Err("re-encrypted token mismatch".into());
            }

            Ok(())
        }
    }
}
