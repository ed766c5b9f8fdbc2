#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::params::{Fields, boolean, constant, optional, parse_record, required, string, with_default};
use twiddle_runtime::{Params, ParamsError};

use crate::api::{ApiContext, BladeApi, ButtonApi, FolderApi, SeparatorApi};
use crate::blade::{
    BladeController, BladeKind, FolderController, FolderProps, FolderPropsObject, LabelController,
    LabelProps, SeparatorController,
};
use crate::controller::{ButtonController, ButtonProps, ButtonPropsObject, ValueControllerKind};
use crate::plugin::{Acceptance, BladeControllerArgs, BladePlugin};

/// Accept when `view` names this blade and the rest parses.
fn accept_view<P>(
    params: &Params,
    view: &'static str,
    build: impl FnOnce(&Fields<'_>) -> Result<P, ParamsError>,
) -> Acceptance<P> {
    let parsed = parse_record(params, |f| {
        f.field("view", required(constant(view)))?;
        build(f)
    });
    parsed.map_or(Acceptance::Rejected, Acceptance::params)
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonBladeParams {
    pub title: String,
    pub label: Option<String>,
}

#[must_use]
pub fn button_blade() -> BladePlugin<ButtonBladeParams> {
    BladePlugin {
        id: "button",
        accept: |params| {
            accept_view(params, "button", |f| {
                Ok(ButtonBladeParams {
                    title: f.field("title", required(string()))?,
                    label: f.field("label", optional(string()))?,
                })
            })
        },
        controller: button_controller,
        api: |controller, _| match controller.kind() {
            BladeKind::Label(label)
                if label.value_controller().kind() == ValueControllerKind::Button =>
            {
                Some(BladeApi::Button(ButtonApi::new(Rc::clone(controller))))
            }
            _ => None,
        },
    }
}

fn button_controller(args: BladeControllerArgs<'_, ButtonBladeParams>) -> Rc<dyn BladeController> {
    let button = ButtonController::new(
        args.document,
        ButtonProps::from_object(ButtonPropsObject {
            title: args.params.title.clone(),
        }),
        args.view_props,
    );
    Rc::new(LabelController::new(
        args.document,
        args.blade,
        LabelProps::with_label(args.params.label.clone()),
        Rc::new(button),
    ))
}

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FolderBladeParams {
    pub title: String,
    pub expanded: bool,
}

#[must_use]
pub fn folder_blade() -> BladePlugin<FolderBladeParams> {
    BladePlugin {
        id: "folder",
        accept: |params| {
            accept_view(params, "folder", |f| {
                Ok(FolderBladeParams {
                    title: f.field("title", required(string()))?,
                    expanded: f.field("expanded", with_default(boolean(), true))?,
                })
            })
        },
        controller: |args| {
            Rc::new(FolderController::new(
                args.document,
                args.blade,
                FolderProps::from_object(FolderPropsObject {
                    title: Some(args.params.title.clone()),
                    expanded: args.params.expanded,
                }),
                args.view_props,
            ))
        },
        api: folder_api,
    }
}

fn folder_api(controller: &Rc<dyn BladeController>, context: &ApiContext) -> Option<BladeApi> {
    FolderApi::from_controller(Rc::clone(controller), context.clone()).map(BladeApi::Folder)
}

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

#[must_use]
pub fn separator_blade() -> BladePlugin<()> {
    BladePlugin {
        id: "separator",
        accept: |params| accept_view(params, "separator", |_| Ok(())),
        controller: |args| {
            Rc::new(SeparatorController::new(
                args.document,
                args.blade,
                args.view_props,
            ))
        },
        api: |controller, _| match controller.kind() {
            BladeKind::Separator => Some(BladeApi::Separator(SeparatorApi::new(Rc::clone(controller)))),
            _ => None,
        },
    }
}
