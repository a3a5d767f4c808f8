use std::path::PathBuf;

use crate::cli::DirArgs;
use crate::error::Result;
use crate::mappings::{template_header, RuleTarget};
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(dirs: &DirArgs) -> Result<()> {
    let settings = load_settings().with_overrides(
        dirs.input_dir.as_deref(),
        dirs.output_dir.as_deref(),
        dirs.mapping_dir.as_deref(),
    );
    save_settings(&settings)?;

    for dir in [&settings.input_dir, &settings.output_dir, &settings.mapping_dir] {
        std::fs::create_dir_all(dir)?;
    }

    let mapping_dir = PathBuf::from(&settings.mapping_dir);
    for target in RuleTarget::ALL {
        let path = target.path_in(&mapping_dir);
        if path.exists() {
            continue;
        }
        std::fs::write(&path, template_header(target))?;
        println!("Created {}", path.display());
    }

    println!("Settings saved to {}", settings_path().display());
    println!("  Input:    {}", settings.input_dir);
    println!("  Output:   {}", settings.output_dir);
    println!("  Mappings: {}", settings.mapping_dir);
    Ok(())
}
