use crate::error::Result;
use linescale::core::molecules::hitran::HitranMolecules;

pub fn run() -> Result<()> {
    let molecules = HitranMolecules::new();
    println!("{:>4}  {}", "id", "molecule");
    for (id, name) in molecules.all() {
        println!("{:>4}  {}", id.0, name);
    }
    Ok(())
}
