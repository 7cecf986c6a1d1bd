use std::env;

use vulkan_api_registry::{resolve_guard, Registry};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "Vulkan-Docs/xml/vk.xml".into());
    let registry = Registry::load(&path).unwrap();
    println!("{} platforms, {} functions", registry.platforms.len(), registry.functions.len());
    for function in registry.functions.iter() {
        match resolve_guard(function, &registry.platforms) {
            Some(guard) => println!("{:?} {} [{}]", function.category, &function.name, guard),
            None => println!("{:?} {}", function.category, &function.name),
        }
    }
}
