use rand::Rng;

pub const IMAGE_SIZE: u32 = 1024;
pub const SEED_RANGE: u32 = 1_000_000;

/// Build a keyless image URL for `prompt`. The seed makes repeated prompts
/// render differently.
pub fn image_url(base: &str, prompt: &str, seed: u32) -> String {
    format!(
        "{}/{}?width={size}&height={size}&seed={}&nologo=true",
        base.trim_end_matches('/'),
        urlencoding::encode(prompt),
        seed,
        size = IMAGE_SIZE,
    )
}

pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_RANGE)
}
