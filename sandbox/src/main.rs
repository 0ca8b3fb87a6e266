// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use coffer::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SaveGame {
    player: String,
    level: u32,
    inventory: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    name: String,
    count: u16,
}

fn sample() -> SaveGame {
    SaveGame {
        player: "ayla".to_string(),
        level: 7,
        inventory: vec![
            Item {
                name: "potion".to_string(),
                count: 3,
            },
            Item {
                name: "rope".to_string(),
                count: 1,
            },
        ],
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    // Missing file means defaults.
    let config = PersistenceConfig::load(Path::new("Persistence.toml"))?
        .with_encryption("sandbox-key", "sandbox-salt");
    run(&PersistenceManager::new(config))
}

// Each file names its method explicitly so any configured default works.
fn run(manager: &PersistenceManager) -> Result<()> {
    let game = sample();
    manager.save_with_method(MethodKind::Json, &game, "slot1.json", None)?;
    manager.save_with_method(MethodKind::Binary, &game, "slot1.bin", None)?;
    manager.save_with_method(MethodKind::JsonEncrypted, &game, "slot1.sav", None)?;

    for (kind, filename) in [
        (MethodKind::Json, "slot1.json"),
        (MethodKind::Binary, "slot1.bin"),
        (MethodKind::JsonEncrypted, "slot1.sav"),
    ] {
        let loaded: Option<SaveGame> = manager.load_with_method(kind, filename, None)?;
        log::info!("{filename} via {kind}: intact = {}", loaded.as_ref() == Some(&game));
    }

    log::info!("Saved files: {:?}", manager.list(None)?);

    for filename in ["slot1.json", "slot1.bin", "slot1.sav"] {
        manager.delete(filename, None)?;
    }
    Ok(())
}
