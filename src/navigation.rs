//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm sm:bg-transparent
        sm:text-blue-700 sm:p-0 dark:text-white sm:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        sm:hover:bg-transparent sm:border-0 sm:hover:text-blue-700 sm:p-0
        dark:text-white sm:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white sm:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    viewer_name: &'a str,
}

impl<'a> NavBar<'a> {
    /// Get the navigation bar for the signed in user called `viewer_name`.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, viewer_name: &'a str) -> NavBar<'a> {
        let links = vec![Link {
            url: endpoints::GROUPS_VIEW,
            title: "Groups",
            is_current: active_endpoint == endpoints::GROUPS_VIEW,
        }];

        NavBar { links, viewer_name }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::GROUPS_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Splitteur"
                        }
                    }

                    div class="flex items-center gap-6"
                    {
                        ul
                            class="font-medium flex flex-row space-x-8 rtl:space-x-reverse"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }

                        span
                            data-viewer-name="true"
                            class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (self.viewer_name)
                        }
                    }
                }
            }
        )
    }
}
