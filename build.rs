//! Retrieves information about the version of the engine from Git and the build
//! environment. It is accessed at runtime through the `shadow!` module and
//! reported in the protocol handshake.

fn main() -> shadow_rs::SdResult<()> {
    let _shadow = shadow_rs::ShadowBuilder::builder().build()?;
    Ok(())
}
