//! Scaffolding templates for new programs
//!
//! `{{program_name}}` is substituted with the program's directory name.

const PROGRAM_NAME: &str = "{{program_name}}";

const ROOT_CMAKELISTS: &str = r#"cmake_minimum_required(VERSION 3.19.0)

set(MXOS_PATH ${CMAKE_CURRENT_SOURCE_DIR}/mxos CACHE INTERNAL "")
set(APP_TARGET {{program_name}})

include(${MXOS_PATH}/tools/cmake/app.cmake)

project(${APP_TARGET})

add_subdirectory(${MXOS_PATH})
add_subdirectory({{program_name}})
"#;

const APP_CMAKELISTS: &str = r#"add_executable(${APP_TARGET})

target_include_directories(${APP_TARGET}
    PRIVATE
        .
)

target_sources(${APP_TARGET}
    PRIVATE
        main.c
)

target_link_libraries(${APP_TARGET} PRIVATE mxos)

mxos_set_post_build(${APP_TARGET})
"#;

const MAIN_C: &str = r#"#include "mxos.h"

int main(void)
{
    app_log("{{program_name}} started");
    return 0;
}
"#;

const MXOS_CONFIG_H: &str = r#"#pragma once

/* Application configuration for {{program_name}} */

#define APP_NAME "{{program_name}}"

#define MXOS_WLAN_CONFIG_MODE CONFIG_MODE_AWS
"#;

const GITIGNORE: &str = "build/\n";

/// A file written by [`crate::Program::create`], relative to the program root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub content: String,
}

/// Render the scaffolding of a program named `program_name`.
pub fn render_program(program_name: &str) -> Vec<RenderedFile> {
    let render = |path: String, template: &str| RenderedFile {
        path,
        content: template.replace(PROGRAM_NAME, program_name),
    };

    vec![
        render("CMakeLists.txt".into(), ROOT_CMAKELISTS),
        render(format!("{program_name}/CMakeLists.txt"), APP_CMAKELISTS),
        render(format!("{program_name}/main.c"), MAIN_C),
        render(format!("{program_name}/mxos_config.h"), MXOS_CONFIG_H),
        render(".gitignore".into(), GITIGNORE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_name() {
        let files = render_program("blinky");

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "CMakeLists.txt",
                "blinky/CMakeLists.txt",
                "blinky/main.c",
                "blinky/mxos_config.h",
                ".gitignore",
            ]
        );
        for file in &files {
            assert!(!file.content.contains(PROGRAM_NAME), "{}", file.path);
        }
        assert!(files[0].content.contains("set(APP_TARGET blinky)"));
    }

    #[test]
    fn test_gitignore_covers_build_dir() {
        let files = render_program("app");
        let gitignore = files.iter().find(|f| f.path == ".gitignore").unwrap();
        assert!(gitignore.content.lines().any(|l| l == "build/"));
    }
}
