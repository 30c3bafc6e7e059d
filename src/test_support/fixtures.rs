//! Fixture generators for fake NDK and Boost trees.
//!
//! The trees carry only the files the tool reads: `source.properties`,
//! `boost/version.hpp`, the bootstrap script or driver, and the sources the
//! patch catalog edits.

use std::path::Path;

use tempfile::TempDir;

use crate::core::abi::HostPlatform;

/// `boost/system/error_code.hpp` excerpt from 1.76.
pub const ERROR_CODE_HPP_1_76: &str = "#ifndef BOOST_SYSTEM_ERROR_CODE_HPP_INCLUDED
#define BOOST_SYSTEM_ERROR_CODE_HPP_INCLUDED

#include <boost/system/api_config.hpp>
#include <boost/system/detail/config.hpp>
#include <string>

#endif // BOOST_SYSTEM_ERROR_CODE_HPP_INCLUDED
";

/// `libs/filesystem/src/path.cpp` excerpt from 1.76.
pub const PATH_CPP_1_76: &str = "#include \"platform_config.hpp\"
#include <boost/filesystem/path.hpp>

#ifdef BOOST_WINDOWS_API
# include <windows.h>
#elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\
 || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)
# include <boost/filesystem/detail/utf8_codecvt_facet.hpp>
#endif

namespace {
  std::locale default_locale()
  {
# if defined(BOOST_WINDOWS_API)
    std::locale global_loc = std::locale();
    return std::locale(global_loc, new windows_file_codecvt);
# elif defined(macintosh) || defined(__APPLE__) || defined(__APPLE_CC__) \\
  || defined(__FreeBSD__) || defined(__OpenBSD__) || defined(__HAIKU__)
    // \"All BSD system functions expect their string parameters to be in UTF-8 encoding
    // and nothing else.\"
    std::locale global_loc = std::locale();
    return std::locale(global_loc, new boost::filesystem::detail::utf8_codecvt_facet);
# endif
  }
}
";

/// `tools/build/src/tools/common.jam` excerpt from 1.76.
pub const COMMON_JAM_1_76: &str = "# Provides actions common to all toolsets, such as creating directories and
# removing files. Toolsets include this module to reuse them.

import os ;

rule format-name ( format * : name : type ? : property-set )
{
    # Ditto, from Clang 4
    if ( $(tag) = clang || $(tag) = clangw ) && $(version[1]) && [ numbers.less 3 $(version[1]) ]
    {
        version = $(version[1]) ;
    }
}
";

/// Fake NDK root.
#[derive(Debug, Clone)]
pub struct NdkFixture {
    properties: String,
}

impl NdkFixture {
    /// An NDK reporting `revision` as its `Pkg.Revision`.
    pub fn new(revision: &str) -> Self {
        NdkFixture {
            properties: format!("Pkg.Desc = Android NDK\nPkg.Revision = {}\n", revision),
        }
    }

    /// An NDK with arbitrary `source.properties` text.
    pub fn with_properties(text: &str) -> Self {
        NdkFixture {
            properties: text.to_string(),
        }
    }

    pub fn create(&self) -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        write(tmp.path(), "source.properties", &self.properties);
        tmp
    }
}

/// Fake Boost source tree.
#[derive(Debug, Clone, Default)]
pub struct BoostFixture {
    header: String,
    driver: bool,
    bootstrap: bool,
    patch_targets: bool,
    fake_driver: Option<String>,
}

impl BoostFixture {
    /// A tree whose `version.hpp` defines `BOOST_LIB_VERSION` as `token`,
    /// e.g. `"1_80"`.
    pub fn new(token: &str) -> Self {
        BoostFixture {
            header: format!(
                "#ifndef BOOST_VERSION_HPP\n#define BOOST_VERSION_HPP\n\
                 #define BOOST_VERSION 108000\n\
                 #define BOOST_LIB_VERSION \"{}\"\n#endif\n",
                token
            ),
            ..Default::default()
        }
    }

    /// A tree with arbitrary `version.hpp` text.
    pub fn with_header(text: &str) -> Self {
        BoostFixture {
            header: text.to_string(),
            ..Default::default()
        }
    }

    /// Place an empty driver executable for the current host.
    pub fn with_driver(mut self) -> Self {
        self.driver = true;
        self
    }

    /// Place a `bootstrap.sh` that produces a working `b2`.
    pub fn with_bootstrap_script(mut self) -> Self {
        self.bootstrap = true;
        self
    }

    /// Place a shell-script `b2` with `body` as its contents.
    pub fn with_fake_driver(mut self, body: &str) -> Self {
        self.fake_driver = Some(body.to_string());
        self
    }

    /// Place the three 1.76 source files the patch catalog edits.
    pub fn with_patch_targets(mut self) -> Self {
        self.patch_targets = true;
        self
    }

    pub fn create(&self) -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = tmp.path();

        write(root, "boost/version.hpp", &self.header);
        write(root, "tools/build/src/build-system.jam", "import modules ;\n");

        if self.driver {
            write(root, HostPlatform::host().driver(), "");
        }
        if self.bootstrap {
            write(
                root,
                "bootstrap.sh",
                "#!/bin/sh\nprintf '#!/bin/sh\\nexit 0\\n' > b2\nchmod +x b2\n",
            );
        }
        if let Some(ref body) = self.fake_driver {
            write(root, "b2", body);
            make_executable(&root.join("b2"));
        }
        if self.patch_targets {
            write(root, "boost/system/error_code.hpp", ERROR_CODE_HPP_1_76);
            write(root, "libs/filesystem/src/path.cpp", PATH_CPP_1_76);
            write(root, "tools/build/src/tools/common.jam", COMMON_JAM_1_76);
        }
        tmp
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create fixture dir");
    }
    std::fs::write(&path, content).expect("failed to write fixture file");
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to mark fixture executable");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
