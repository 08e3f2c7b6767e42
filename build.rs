use vergen::EmitBuilder;

fn main() {
    // vergen emits idempotent default values when git metadata is
    // unavailable, so the env vars are always present at compile time.
    EmitBuilder::builder()
        .build_timestamp()
        .git_sha(false) // Short SHA
        .emit()
        .expect("Unable to generate build metadata");
}
