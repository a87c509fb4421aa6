//! Build script that checks for the system libraries face-mouse links
//! against (OpenCV for capture/preview, X11 for pointer injection) and
//! prints installation hints when they are missing.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    check_opencv();
    check_x11();
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    for pkg in ["opencv4", "opencv"] {
        if let Ok(output) = Command::new("pkg-config").args(["--modversion", pkg]).output() {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout);
                println!("cargo:warning=Found OpenCV version: {}", version.trim());
                return;
            }
        }
    }

    println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
    println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
    println!("cargo:warning=On macOS: brew install opencv");
}

fn check_x11() {
    if !env::var("TARGET").unwrap_or_default().contains("linux") {
        return;
    }

    match Command::new("pkg-config").args(["--exists", "x11"]).output() {
        Ok(output) if output.status.success() => {
            println!("cargo:warning=Found X11 libraries");
        }
        _ => {
            println!("cargo:warning=X11 libraries not found. Pointer injection will not work.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libx11-dev");
        }
    }
}
