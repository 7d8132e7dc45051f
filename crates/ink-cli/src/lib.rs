//! inkmap: command line front end for the ink-core level generator

pub mod loader;

use ink_core::{GameRng, Level, LevelTemplate, ShapeSource, generate_level};

pub use loader::{CliError, load_shape, load_shape_dir, load_template};

/// Generate a level, retrying with the next seed on retryable failures
///
/// Attempt `n` (0-based) uses `seed + n`. Returns the level and the seed that
/// produced it.
pub fn generate_with_retries<S>(
    template: &LevelTemplate,
    shapes: &mut S,
    seed: u64,
    attempts: u32,
) -> Result<(Level, u64), CliError>
where
    S: ShapeSource + ?Sized,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;

    loop {
        let attempt_seed = seed.wrapping_add(u64::from(attempt));
        let mut rng = GameRng::new(attempt_seed);
        match generate_level(template, shapes, &mut rng) {
            Ok(level) => return Ok((level, attempt_seed)),
            Err(err) if err.is_retryable() => {
                attempt += 1;
                if attempt >= attempts {
                    return Err(CliError::Exhausted {
                        attempts,
                        last: err,
                    });
                }
                tracing::warn!(attempt, seed = attempt_seed, error = %err, "generation failed, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }
}
